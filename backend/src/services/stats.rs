//! Task statistics service
//!
//! The summary endpoint is read-heavy, so the counts run concurrently
//! against the pool instead of sequentially.

use crate::error::ApiResult;
use crate::repositories::TaskRepository;
use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone, Utc};
use health_hub_shared::bmi::round1;
use health_hub_shared::types::TaskStatsResponse;
use sqlx::PgPool;
use uuid::Uuid;

/// Statistics service
pub struct StatsService;

impl StatsService {
    /// Build the task summary for a user
    ///
    /// "Today" is the server's local calendar day. `todayTasks` counts tasks
    /// created since local midnight; `todayCompletedTasks` counts tasks
    /// completed since local midnight, whenever they were created.
    pub async fn summary(pool: &PgPool, user_id: Uuid) -> ApiResult<TaskStatsResponse> {
        let today = start_of_today();

        let (total, completed, pending, today_total, today_completed, by_category) = tokio::try_join!(
            TaskRepository::count_all(pool, user_id),
            TaskRepository::count_by_completed(pool, user_id, true),
            TaskRepository::count_by_completed(pool, user_id, false),
            TaskRepository::count_created_since(pool, user_id, today),
            TaskRepository::count_completed_since(pool, user_id, today),
            TaskRepository::count_by_category(pool, user_id),
        )?;

        Ok(TaskStatsResponse {
            total_tasks: total,
            completed_tasks: completed,
            pending_tasks: pending,
            today_tasks: today_total,
            today_completed_tasks: today_completed,
            completion_rate: completion_rate(completed, total),
            tasks_by_category: by_category.into_iter().collect(),
        })
    }
}

/// Completion percentage rounded to one decimal; 0 when there are no tasks
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(completed as f64 / total as f64 * 100.0)
}

/// Local midnight expressed in UTC
fn start_of_today() -> DateTime<Utc> {
    let midnight = Local::now().date_naive().and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // Midnight fell into a DST gap; the day effectively starts at the
        // first representable instant after it
        LocalResult::None => Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 0.0)]
    #[case(0, 10, 0.0)]
    #[case(10, 10, 100.0)]
    #[case(1, 3, 33.3)]
    #[case(2, 3, 66.7)]
    #[case(7, 8, 87.5)]
    fn test_completion_rate(#[case] completed: i64, #[case] total: i64, #[case] expected: f64) {
        assert_eq!(completion_rate(completed, total), expected);
    }

    #[test]
    fn test_start_of_today_is_not_in_the_future() {
        assert!(start_of_today() <= Utc::now());
    }
}
