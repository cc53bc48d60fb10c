//! Plan persistence seam.
//!
//! [`PlanStore`] is what the service depends on; the PostgreSQL pool is the
//! production implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use planwright_db::models::{Plan, TaskItem};
use planwright_db::queries::plans as plan_queries;

/// Storage write or read failure.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("no plan store is configured")]
    Unavailable,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Create-and-list storage for plans. No update or delete exists.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Persist a new plan; the store assigns `id` and `created_at`.
    async fn create_plan(&self, goal: &str, items: &[TaskItem]) -> Result<Plan, PersistenceError>;

    /// Every stored plan, newest first.
    async fn list_plans(&self) -> Result<Vec<Plan>, PersistenceError>;
}

#[async_trait]
impl PlanStore for PgPool {
    async fn create_plan(&self, goal: &str, items: &[TaskItem]) -> Result<Plan, PersistenceError> {
        Ok(plan_queries::insert_plan(self, goal, items).await?)
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, PersistenceError> {
        Ok(plan_queries::list_plans(self).await?)
    }
}
