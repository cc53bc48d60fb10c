//! Core logic for planwright: talking to the completion service, turning
//! its loosely structured reply into a sanitized task list, and persisting
//! the result.

pub mod completion;
pub mod plan;
