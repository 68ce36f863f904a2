//! API request and response types
//!
//! Wire shapes for the Health Hub REST API. Field names are camelCase on the
//! wire; clients distinguish a failed AI parse from a structured result by
//! the presence of a `rawResponse` field inside `data`.

use crate::models::{
    ActivityLevel, BmiHistoryEntry, DietaryRestriction, Gender, Goal, Recurrence, TaskCategory,
    TaskMetrics, TaskPriority,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Auth
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// Profile and BMI
// ============================================================================

/// User profile response (password hash is never exposed)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Height in cm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Weight in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goals: Vec<Goal>,
    pub dietary_restrictions: Vec<DietaryRestriction>,
    /// Derived on read, never stored; null when height or weight is missing
    #[serde(rename = "currentBMI")]
    pub current_bmi: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile update request
///
/// Deliberately has no email or password fields: those travel through the
/// dedicated auth flows, and any such keys in the body are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goals: Option<Vec<Goal>>,
    pub dietary_restrictions: Option<Vec<DietaryRestriction>>,
}

/// Profile update response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateResponse {
    pub message: String,
    pub user: ProfileResponse,
}

/// Biometrics update request (PUT /api/users/bmi)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBmiRequest {
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

/// Biometrics update response: derived BMI plus the 10 newest history entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiUpdateResponse {
    pub message: String,
    #[serde(rename = "currentBMI")]
    pub current_bmi: f64,
    pub bmi_history: Vec<BmiHistoryEntry>,
}

/// Stateless BMI calculation request (POST /api/users/calculate-bmi)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateBmiRequest {
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

/// Stateless BMI calculation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateBmiResponse {
    pub bmi: f64,
    pub category: String,
    pub weight: f64,
    pub height: f64,
}

// ============================================================================
// Tasks
// ============================================================================

/// Task response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<DateTime<Utc>>,
    pub recurring: Recurrence,
    pub metrics: TaskMetrics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task list query parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskListQuery {
    /// Filter by completion state
    pub completed: Option<bool>,
    /// Filter by category label; "all" means no filter
    pub category: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Paginated task list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

/// Task creation request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder: Option<DateTime<Utc>>,
    pub recurring: Option<Recurrence>,
    pub metrics: Option<TaskMetrics>,
}

/// Partial task update request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder: Option<DateTime<Utc>>,
    pub recurring: Option<Recurrence>,
    pub metrics: Option<TaskMetrics>,
}

/// Mutation response carrying a message and the affected task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMessageResponse {
    pub message: String,
    pub task: TaskResponse,
}

/// Task statistics summary (GET /api/tasks/stats/summary)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatsResponse {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub today_tasks: i64,
    pub today_completed_tasks: i64,
    /// Percentage rounded to one decimal; 0 when there are no tasks
    pub completion_rate: f64,
    pub tasks_by_category: BTreeMap<String, i64>,
}

// ============================================================================
// AI generation
// ============================================================================

/// Meal plan generation request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MealPlanRequest {
    pub preferences: Option<String>,
    pub duration: Option<u32>,
}

/// Workout plan generation request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkoutPlanRequest {
    pub preferences: Option<String>,
    pub duration: Option<u32>,
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// Health recommendations request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecommendationsRequest {
    pub focus: Option<String>,
}

/// AI generation response
///
/// `data` is either the parsed plan object or, when the model reply could
/// not be parsed as JSON, a fallback object with `rawResponse` and `note`
/// fields. Both outcomes are a success at the HTTP level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiContentResponse {
    pub message: String,
    pub data: serde_json::Value,
    pub generated_at: DateTime<Utc>,
}
