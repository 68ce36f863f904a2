//! Input validation
//!
//! Explicit field validators evaluated before an entity is constructed or
//! persisted. Validators accumulate into a [`Violations`] list so a caller
//! can report every offending field instead of only the first.

use crate::models::{Recurrence, TaskCategory, TaskPriority};
use std::fmt;
use std::str::FromStr;

/// A single field violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Accumulated validation violations
#[derive(Debug, Clone, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the error side of a validator result against a field
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.push(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }

    /// Collapse into a single error message, or Ok if nothing was recorded
    pub fn into_result(self) -> Result<(), String> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self
                .0
                .iter()
                .map(FieldError::to_string)
                .collect::<Vec<_>>()
                .join("; "))
        }
    }
}

/// Validate age in years (1-120)
pub fn validate_age(age: i32) -> Result<(), String> {
    if !(1..=120).contains(&age) {
        return Err("Age must be between 1 and 120".to_string());
    }
    Ok(())
}

/// Validate height in cm (50-300)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if !(50.0..=300.0).contains(&height_cm) {
        return Err("Height must be between 50 and 300 cm".to_string());
    }
    Ok(())
}

/// Validate weight in kg (20-500)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if !(20.0..=500.0).contains(&weight_kg) {
        return Err("Weight must be between 20 and 500 kg".to_string());
    }
    Ok(())
}

/// Validate and normalize a task title: trimmed, non-empty
pub fn validate_task_title(title: &str) -> Result<String, String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Task title is required".to_string());
    }
    Ok(trimmed.to_string())
}

/// Parse a task category label
pub fn validate_category(category: &str) -> Result<TaskCategory, String> {
    TaskCategory::from_str(category)
}

/// Parse a task priority label
pub fn validate_priority(priority: &str) -> Result<TaskPriority, String> {
    TaskPriority::from_str(priority)
}

/// Validate a recurrence descriptor: every day-of-week entry must be 0-6
pub fn validate_recurrence(recurrence: &Recurrence) -> Result<(), String> {
    for day in &recurrence.days_of_week {
        if !(0..=6).contains(day) {
            return Err(format!("Day of week {} is out of range 0-6", day));
        }
    }
    Ok(())
}
