//! Health Hub Shared Library
//!
//! This crate contains the domain types, BMI calculations, and input
//! validation shared between the backend and any future clients.

pub mod bmi;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use bmi::{compute_bmi, BmiCategory, BmiReading};
pub use models::*;
pub use types::*;
