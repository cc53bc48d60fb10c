//! In-process fakes for the completion service and the plan store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use planwright_core::completion::{CompletionClient, CompletionError};
use planwright_core::plan::{PersistenceError, PlanStore};
use planwright_db::models::{Plan, TaskItem};

enum Reply {
    Content(Option<String>),
    Status(u16, String),
}

/// Completion client that returns one canned reply and records prompts.
pub struct ScriptedCompletion {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    /// Reply with `text` as the first choice's content.
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Reply::Content(Some(text.to_string())))
    }

    /// Reply with a response that has no content at all.
    pub fn empty() -> Self {
        Self::with_reply(Reply::Content(None))
    }

    /// Fail every call as if the API answered with `status`.
    pub fn failing(status: u16, message: &str) -> Self {
        Self::with_reply(Reply::Status(status, message.to_string()))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<Option<String>, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Content(text) => Ok(text.clone()),
            Reply::Status(status, message) => Err(CompletionError::Status {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Plan store kept in memory. `created_at` is taken from the wall clock.
#[derive(Default)]
pub struct MemoryPlanStore {
    plans: Mutex<Vec<Plan>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored plans in insertion order.
    pub fn stored(&self) -> Vec<Plan> {
        self.plans.lock().unwrap().clone()
    }

    /// Insert a fully-formed plan, bypassing the service.
    pub fn push(&self, plan: Plan) {
        self.plans.lock().unwrap().push(plan);
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn create_plan(&self, goal: &str, items: &[TaskItem]) -> Result<Plan, PersistenceError> {
        let plan = Plan {
            id: Uuid::new_v4(),
            goal: goal.to_string(),
            items: items.to_vec(),
            created_at: Utc::now(),
        };
        self.plans.lock().unwrap().push(plan.clone());
        Ok(plan)
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, PersistenceError> {
        let mut plans = self.stored();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(plans)
    }
}

/// Plan store whose every operation fails.
pub struct FailingPlanStore;

#[async_trait]
impl PlanStore for FailingPlanStore {
    async fn create_plan(&self, _goal: &str, _items: &[TaskItem]) -> Result<Plan, PersistenceError> {
        Err(anyhow::anyhow!("connection reset by peer").into())
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, PersistenceError> {
        Err(anyhow::anyhow!("connection reset by peer").into())
    }
}
