//! Plan service layer.
//!
//! Composes the completion client, the parser, the sanitizer and the
//! optional store into the two operations the HTTP surface exposes:
//! generating a plan from a goal and listing stored plans.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use planwright_db::models::{Plan, TaskItem};

use crate::completion::{CompletionClient, CompletionError};

use super::parser::{parse_task_array, strip_code_fences};
use super::prompt::build_prompt;
use super::sanitize::sanitize_items;
use super::store::{PersistenceError, PlanStore};

/// Reply text substituted when the completion service returns no content.
const EMPTY_REPLY: &str = "[]";

/// Result of a successful generation, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub goal: String,
    pub plan: Vec<TaskItem>,
}

/// Reasons a generation request fails.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("goal is required")]
    InvalidInput,

    #[error("completion service did not return a JSON array")]
    UpstreamFormat {
        /// The reply after trimming and fence removal.
        raw: String,
    },

    #[error(transparent)]
    Upstream(#[from] CompletionError),
}

/// Shared, request-independent dependencies of the plan workflow.
///
/// Built once at startup and shared by every request.
pub struct PlanService {
    completion: Arc<dyn CompletionClient>,
    store: Option<Arc<dyn PlanStore>>,
}

impl PlanService {
    /// `store = None` disables persistence; generation still works.
    pub fn new(completion: Arc<dyn CompletionClient>, store: Option<Arc<dyn PlanStore>>) -> Self {
        Self { completion, store }
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Generate, sanitize, and (best-effort) persist a plan for `goal`.
    ///
    /// A storage failure is logged and does not affect the result.
    pub async fn generate(&self, goal: &str) -> Result<GeneratedPlan, GenerateError> {
        if goal.is_empty() {
            return Err(GenerateError::InvalidInput);
        }

        let reply = self.completion.complete(&build_prompt(goal)).await?;
        let reply = reply
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(EMPTY_REPLY);
        debug!(backend = self.completion.name(), raw = reply, "completion reply");

        let Some(elements) = parse_task_array(reply) else {
            let raw = strip_code_fences(reply);
            warn!(raw = %raw, "completion reply is not a JSON array");
            return Err(GenerateError::UpstreamFormat { raw });
        };

        let plan = sanitize_items(&elements);
        self.persist(goal, &plan).await;

        Ok(GeneratedPlan {
            goal: goal.to_string(),
            plan,
        })
    }

    async fn persist(&self, goal: &str, items: &[TaskItem]) {
        let Some(store) = &self.store else {
            debug!("no plan store configured; skipping save");
            return;
        };
        match store.create_plan(goal, items).await {
            Ok(saved) => info!(plan_id = %saved.id, tasks = items.len(), "plan saved"),
            Err(e) => warn!(error = %e, "failed to save plan"),
        }
    }

    /// All stored plans, newest first.
    pub async fn list_plans(&self) -> Result<Vec<Plan>, PersistenceError> {
        let store = self.store.as_ref().ok_or(PersistenceError::Unavailable)?;
        store.list_plans().await
    }
}
