//! Task service
//!
//! CRUD and completion tracking for health tasks. The one invariant that
//! everything funnels through is `completed_at`: it is set exactly when a
//! task transitions to completed, kept across no-op updates, and cleared
//! the moment a task is marked incomplete again. Every write path applies
//! [`completion_timestamp`] before touching the database.

use crate::error::{ApiError, ApiResult};
use crate::repositories::{CreateTask, TaskFilter, TaskRecord, TaskRepository};
use chrono::{DateTime, Utc};
use health_hub_shared::models::{Recurrence, TaskMetrics};
use health_hub_shared::types::{
    CreateTaskRequest, TaskListQuery, TaskListResponse, TaskResponse, UpdateTaskRequest,
};
use health_hub_shared::validation::{
    validate_category, validate_priority, validate_recurrence, validate_task_title,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Task service
pub struct TaskService;

impl TaskService {
    /// List tasks newest-first with optional filters and pagination
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: TaskListQuery,
    ) -> ApiResult<TaskListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;

        let filter = TaskFilter {
            completed: query.completed,
            category: parse_category_filter(query.category.as_deref())?,
        };

        let (records, total) = TaskRepository::list(pool, user_id, &filter, limit, offset).await?;

        let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

        Ok(TaskListResponse {
            tasks: records.into_iter().map(record_to_response).collect(),
            total,
            page,
            pages,
        })
    }

    /// Create a task
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateTaskRequest,
    ) -> ApiResult<TaskResponse> {
        let title = validate_task_title(req.title.as_deref().unwrap_or(""))
            .map_err(ApiError::Validation)?;

        // Category has no default; a task without one is rejected outright
        let category = req
            .category
            .as_deref()
            .ok_or_else(|| ApiError::Validation("Task category is required".to_string()))
            .and_then(|c| validate_category(c).map_err(ApiError::Validation))?;
        let priority = match req.priority.as_deref() {
            Some(p) => validate_priority(p).map_err(ApiError::Validation)?,
            None => Default::default(),
        };

        let recurring = req.recurring.unwrap_or_default();
        validate_recurrence(&recurring).map_err(ApiError::Validation)?;

        let metrics = req.metrics.unwrap_or_default();

        let record = TaskRepository::create(
            pool,
            CreateTask {
                user_id,
                title,
                description: req
                    .description
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
                category: category.as_str().to_string(),
                priority: priority.as_str().to_string(),
                due_date: req.due_date,
                reminder: req.reminder,
                recurring_enabled: recurring.enabled,
                recurring_frequency: recurring.frequency.map(|f| f.as_str().to_string()),
                recurring_days: recurring.days_of_week,
                metric_duration: metrics.duration,
                metric_calories: metrics.calories,
                metric_distance: metrics.distance,
                metric_sets: metrics.sets,
                metric_reps: metrics.reps,
                metric_weight: metrics.weight,
                metric_water_amount: metrics.water_amount,
                metric_sleep_hours: metrics.sleep_hours,
            },
        )
        .await?;

        info!(user_id = %user_id, task_id = %record.id, "Task created");

        Ok(record_to_response(record))
    }

    /// Get a single task
    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> ApiResult<TaskResponse> {
        let record = TaskRepository::find_by_id(pool, id, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        Ok(record_to_response(record))
    }

    /// Apply a partial update to a task
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: UpdateTaskRequest,
    ) -> ApiResult<TaskResponse> {
        let mut record = TaskRepository::find_by_id(pool, id, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        if let Some(title) = req.title {
            record.title = validate_task_title(&title).map_err(ApiError::Validation)?;
        }
        if let Some(description) = req.description {
            let trimmed = description.trim();
            record.description = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
        if let Some(category) = req.category.as_deref() {
            record.category = validate_category(category)
                .map_err(ApiError::Validation)?
                .as_str()
                .to_string();
        }
        if let Some(priority) = req.priority.as_deref() {
            record.priority = validate_priority(priority)
                .map_err(ApiError::Validation)?
                .as_str()
                .to_string();
        }
        if let Some(due_date) = req.due_date {
            record.due_date = Some(due_date);
        }
        if let Some(reminder) = req.reminder {
            record.reminder = Some(reminder);
        }
        if let Some(recurring) = req.recurring {
            validate_recurrence(&recurring).map_err(ApiError::Validation)?;
            record.recurring_enabled = recurring.enabled;
            record.recurring_frequency = recurring.frequency.map(|f| f.as_str().to_string());
            record.recurring_days = recurring.days_of_week;
        }
        if let Some(metrics) = req.metrics {
            apply_metrics(&mut record, &metrics);
        }

        if let Some(completed) = req.completed {
            record.completed_at =
                completion_timestamp(record.completed, completed, record.completed_at, Utc::now());
            record.completed = completed;
        }

        let record = TaskRepository::update(pool, &record)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        Ok(record_to_response(record))
    }

    /// Flip a task's completion state
    ///
    /// Returns the updated task and a human message stating the new state.
    pub async fn toggle(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> ApiResult<(TaskResponse, String)> {
        let mut record = TaskRepository::find_by_id(pool, id, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        let target = !record.completed;
        record.completed_at =
            completion_timestamp(record.completed, target, record.completed_at, Utc::now());
        record.completed = target;

        let record = TaskRepository::update(pool, &record)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        let message = if record.completed {
            "Task marked as completed".to_string()
        } else {
            "Task marked as pending".to_string()
        };

        Ok((record_to_response(record), message))
    }

    /// Delete a task
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> ApiResult<()> {
        let deleted = TaskRepository::delete(pool, id, user_id).await?;
        if !deleted {
            return Err(ApiError::NotFound("Task not found".to_string()));
        }
        info!(user_id = %user_id, task_id = %id, "Task deleted");
        Ok(())
    }
}

/// Decide the `completed_at` value for a completion-state change
///
/// - incomplete -> completed: stamp now
/// - completed -> incomplete: clear
/// - no transition: keep the existing stamp
pub fn completion_timestamp(
    was_completed: bool,
    is_completed: bool,
    existing: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (was_completed, is_completed) {
        (false, true) => Some(now),
        (_, false) => None,
        (true, true) => existing,
    }
}

/// Parse the `category` query filter; "all" and absence both mean no filter
fn parse_category_filter(category: Option<&str>) -> ApiResult<Option<String>> {
    match category {
        None => Ok(None),
        Some("all") => Ok(None),
        Some(c) => Ok(Some(
            validate_category(c)
                .map_err(ApiError::Validation)?
                .as_str()
                .to_string(),
        )),
    }
}

fn apply_metrics(record: &mut TaskRecord, metrics: &TaskMetrics) {
    record.metric_duration = metrics.duration;
    record.metric_calories = metrics.calories;
    record.metric_distance = metrics.distance;
    record.metric_sets = metrics.sets;
    record.metric_reps = metrics.reps;
    record.metric_weight = metrics.weight;
    record.metric_water_amount = metrics.water_amount;
    record.metric_sleep_hours = metrics.sleep_hours;
}

/// Map a database record onto the wire task shape
pub(crate) fn record_to_response(record: TaskRecord) -> TaskResponse {
    // Stored labels are written only through validated paths, so a parse
    // failure here would be data corruption; fall back to defaults rather
    // than failing a whole list over one row.
    let category = record.category.parse().unwrap_or_default();
    let priority = record.priority.parse().unwrap_or_default();

    TaskResponse {
        id: record.id.to_string(),
        title: record.title,
        description: record.description,
        category,
        priority,
        completed: record.completed,
        completed_at: record.completed_at,
        due_date: record.due_date,
        reminder: record.reminder,
        recurring: Recurrence {
            enabled: record.recurring_enabled,
            frequency: record
                .recurring_frequency
                .as_deref()
                .and_then(|f| f.parse().ok()),
            days_of_week: record.recurring_days,
        },
        metrics: TaskMetrics {
            duration: record.metric_duration,
            calories: record.metric_calories,
            distance: record.metric_distance,
            sets: record.metric_sets,
            reps: record.metric_reps,
            weight: record.metric_weight,
            water_amount: record.metric_water_amount,
            sleep_hours: record.metric_sleep_hours,
        },
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_completing_stamps_now() {
        let now = t(1_000);
        assert_eq!(completion_timestamp(false, true, None, now), Some(now));
    }

    #[test]
    fn test_uncompleting_clears_stamp() {
        let now = t(2_000);
        assert_eq!(completion_timestamp(true, false, Some(t(1_000)), now), None);
    }

    #[test]
    fn test_no_transition_keeps_stamp() {
        let stamped = t(1_000);
        let now = t(2_000);
        assert_eq!(
            completion_timestamp(true, true, Some(stamped), now),
            Some(stamped)
        );
    }

    #[test]
    fn test_staying_incomplete_stays_clear() {
        assert_eq!(completion_timestamp(false, false, None, t(1_000)), None);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_category_before_any_query() {
        // Lazy pool with nothing listening: validation must fail first,
        // so the pool is never touched
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/unreachable")
            .unwrap();
        let req = CreateTaskRequest {
            title: Some("Run 5k".to_string()),
            ..Default::default()
        };

        let err = TaskService::create(&pool, Uuid::new_v4(), req)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(ref m) if m.contains("category")));
    }

    #[test]
    fn test_category_filter_all_means_none() {
        assert_eq!(parse_category_filter(None).unwrap(), None);
        assert_eq!(parse_category_filter(Some("all")).unwrap(), None);
        assert_eq!(
            parse_category_filter(Some("workout")).unwrap(),
            Some("workout".to_string())
        );
        assert!(parse_category_filter(Some("running")).is_err());
    }
}
