//! Plan generation: prompt, reply parsing, sanitizing, storage, service layer.

pub mod parser;
pub mod prompt;
pub mod sanitize;
pub mod service;
pub mod store;

pub use parser::{parse_model_output, parse_task_array, strip_code_fences};
pub use prompt::build_prompt;
pub use sanitize::sanitize_items;
pub use service::{GenerateError, GeneratedPlan, PlanService};
pub use store::{PersistenceError, PlanStore};
