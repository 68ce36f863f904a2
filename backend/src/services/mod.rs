//! Business logic layer
//!
//! Services validate input, enforce domain invariants, and orchestrate
//! repositories. They return `ApiError` directly so routes stay thin.

pub mod plans;
pub mod profile;
pub mod stats;
pub mod task;
pub mod user;

pub use plans::PlanService;
pub use profile::ProfileService;
pub use stats::StatsService;
pub use task::TaskService;
pub use user::UserService;
