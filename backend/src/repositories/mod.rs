//! Data access layer
//!
//! Repositories own all SQL. They return plain records and anyhow errors;
//! domain parsing and HTTP mapping happen in the service layer above.

mod task;
mod user;

pub use task::{CreateTask, TaskFilter, TaskRecord, TaskRepository};
pub use user::{BmiHistoryRecord, UpdateProfile, UserRecord, UserRepository};
