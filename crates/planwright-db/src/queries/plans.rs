//! Database query functions for the `plans` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::types::Json;

use crate::models::{Plan, TaskItem};

/// Insert a new plan row. Returns the inserted plan with server-generated
/// defaults (id, created_at).
pub async fn insert_plan(pool: &PgPool, goal: &str, items: &[TaskItem]) -> Result<Plan> {
    let plan = sqlx::query_as::<_, Plan>(
        "INSERT INTO plans (goal, items) \
         VALUES ($1, $2) \
         RETURNING id, goal, items, created_at",
    )
    .bind(goal)
    .bind(Json(items))
    .fetch_one(pool)
    .await
    .context("failed to insert plan")?;

    Ok(plan)
}

/// List all plans, ordered by creation time (newest first).
pub async fn list_plans(pool: &PgPool) -> Result<Vec<Plan>> {
    let plans = sqlx::query_as::<_, Plan>(
        "SELECT id, goal, items, created_at FROM plans ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
    .context("failed to list plans")?;

    Ok(plans)
}
