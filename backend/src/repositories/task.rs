//! Task repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Task record from database
///
/// Category, priority, and recurrence frequency are stored as text and
/// parsed at the service layer. Metric columns are all nullable; a task
/// with no metrics has every one of them NULL.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder: Option<DateTime<Utc>>,
    pub recurring_enabled: bool,
    pub recurring_frequency: Option<String>,
    pub recurring_days: Vec<i16>,
    pub metric_duration: Option<f64>,
    pub metric_calories: Option<f64>,
    pub metric_distance: Option<f64>,
    pub metric_sets: Option<i32>,
    pub metric_reps: Option<i32>,
    pub metric_weight: Option<f64>,
    pub metric_water_amount: Option<f64>,
    pub metric_sleep_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub priority: String,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder: Option<DateTime<Utc>>,
    pub recurring_enabled: bool,
    pub recurring_frequency: Option<String>,
    pub recurring_days: Vec<i16>,
    pub metric_duration: Option<f64>,
    pub metric_calories: Option<f64>,
    pub metric_distance: Option<f64>,
    pub metric_sets: Option<i32>,
    pub metric_reps: Option<i32>,
    pub metric_weight: Option<f64>,
    pub metric_water_amount: Option<f64>,
    pub metric_sleep_hours: Option<f64>,
}

/// Task list filters
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub category: Option<String>,
}

const TASK_COLUMNS: &str = "id, user_id, title, description, category, priority, completed, \
     completed_at, due_date, reminder, recurring_enabled, recurring_frequency, recurring_days, \
     metric_duration, metric_calories, metric_distance, metric_sets, metric_reps, metric_weight, \
     metric_water_amount, metric_sleep_hours, created_at, updated_at";

/// Task repository for database operations
pub struct TaskRepository;

impl TaskRepository {
    /// Create a new task
    pub async fn create(pool: &PgPool, input: CreateTask) -> Result<TaskRecord> {
        let record = sqlx::query_as::<_, TaskRecord>(&format!(
            r#"
            INSERT INTO tasks (
                user_id, title, description, category, priority, due_date, reminder,
                recurring_enabled, recurring_frequency, recurring_days,
                metric_duration, metric_calories, metric_distance, metric_sets,
                metric_reps, metric_weight, metric_water_amount, metric_sleep_hours
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(input.user_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.priority)
        .bind(input.due_date)
        .bind(input.reminder)
        .bind(input.recurring_enabled)
        .bind(&input.recurring_frequency)
        .bind(&input.recurring_days)
        .bind(input.metric_duration)
        .bind(input.metric_calories)
        .bind(input.metric_distance)
        .bind(input.metric_sets)
        .bind(input.metric_reps)
        .bind(input.metric_weight)
        .bind(input.metric_water_amount)
        .bind(input.metric_sleep_hours)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Get a task by ID, scoped to its owner
    pub async fn find_by_id(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<TaskRecord>> {
        let record = sqlx::query_as::<_, TaskRecord>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// List tasks for a user, newest first, with a total count for paging
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        filter: &TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TaskRecord>, i64)> {
        let records = sqlx::query_as::<_, TaskRecord>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1
              AND ($2::boolean IS NULL OR completed = $2)
              AND ($3::text IS NULL OR category = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        ))
        .bind(user_id)
        .bind(filter.completed)
        .bind(&filter.category)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE user_id = $1
              AND ($2::boolean IS NULL OR completed = $2)
              AND ($3::text IS NULL OR category = $3)
            "#,
        )
        .bind(user_id)
        .bind(filter.completed)
        .bind(&filter.category)
        .fetch_one(pool)
        .await?;

        Ok((records, total.0))
    }

    /// Write back every mutable column of a task
    ///
    /// The service layer merges the partial update into the fetched record
    /// first, so this is a whole-row write rather than a COALESCE dance.
    pub async fn update(pool: &PgPool, record: &TaskRecord) -> Result<Option<TaskRecord>> {
        let updated = sqlx::query_as::<_, TaskRecord>(&format!(
            r#"
            UPDATE tasks SET
                title = $3,
                description = $4,
                category = $5,
                priority = $6,
                completed = $7,
                completed_at = $8,
                due_date = $9,
                reminder = $10,
                recurring_enabled = $11,
                recurring_frequency = $12,
                recurring_days = $13,
                metric_duration = $14,
                metric_calories = $15,
                metric_distance = $16,
                metric_sets = $17,
                metric_reps = $18,
                metric_weight = $19,
                metric_water_amount = $20,
                metric_sleep_hours = $21,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.category)
        .bind(&record.priority)
        .bind(record.completed)
        .bind(record.completed_at)
        .bind(record.due_date)
        .bind(record.reminder)
        .bind(record.recurring_enabled)
        .bind(&record.recurring_frequency)
        .bind(&record.recurring_days)
        .bind(record.metric_duration)
        .bind(record.metric_calories)
        .bind(record.metric_distance)
        .bind(record.metric_sets)
        .bind(record.metric_reps)
        .bind(record.metric_weight)
        .bind(record.metric_water_amount)
        .bind(record.metric_sleep_hours)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    /// Delete a task, scoped to its owner
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all tasks for a user
    pub async fn count_all(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Count tasks by completion state
    pub async fn count_by_completed(pool: &PgPool, user_id: Uuid, completed: bool) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND completed = $2")
                .bind(user_id)
                .bind(completed)
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }

    /// Count tasks created on or after a timestamp
    pub async fn count_created_since(
        pool: &PgPool,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND created_at >= $2")
                .bind(user_id)
                .bind(since)
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }

    /// Count tasks completed on or after a timestamp
    ///
    /// Filters on `completed_at`, not `created_at`: a task created last week
    /// and finished today counts as completed today.
    pub async fn count_completed_since(
        pool: &PgPool,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND completed = TRUE AND completed_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    /// Count tasks per category
    pub async fn count_by_category(pool: &PgPool, user_id: Uuid) -> Result<Vec<(String, i64)>> {
        let counts: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT category, COUNT(*)
            FROM tasks
            WHERE user_id = $1
            GROUP BY category
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(counts)
    }
}
