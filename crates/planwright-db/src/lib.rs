//! Persistence layer for planwright: connection bootstrap, embedded
//! migrations, row models, and queries against the `plans` table.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
