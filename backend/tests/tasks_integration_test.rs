//! Integration tests for task endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn create_task(
    app: &common::TestApp,
    token: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let (status, response) = app.post_auth("/api/tasks", &body.to_string(), token).await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "task creation failed: {}",
        response
    );
    serde_json::from_str(&response).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_tasks_require_auth() {
    let app = common::TestApp::new().await;

    let (status, _) = app.get("/api/tasks").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_task_with_defaults() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({
        "title": "  Run 5k  ",
        "category": "workout",
        "description": "  easy pace  "
    });
    let created = create_task(&app, &user.access_token, body).await;

    let task = &created["task"];
    assert_eq!(task["title"], "Run 5k");
    assert_eq!(task["description"], "easy pace");
    assert_eq!(task["category"], "workout");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["completed"], false);
    assert!(task["completedAt"].is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_task_requires_title() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "title": "   ", "category": "workout" });
    let (status, _) = app
        .post_auth("/api/tasks", &body.to_string(), &user.access_token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_task_requires_category() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, response) = app
        .post_auth(
            "/api/tasks",
            &json!({ "title": "Run 5k" }).to_string(),
            &user.access_token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["message"], "Task category is required");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_task_rejects_unknown_category() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "title": "Swim", "category": "swimming" });
    let (status, _) = app
        .post_auth("/api/tasks", &body.to_string(), &user.access_token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_task_with_metrics_and_recurrence() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({
        "title": "Morning lift",
        "category": "workout",
        "priority": "high",
        "recurring": { "enabled": true, "frequency": "weekly", "daysOfWeek": [1, 3, 5] },
        "metrics": { "sets": 5, "reps": 5, "weight": 80.0 }
    });
    let created = create_task(&app, &user.access_token, body).await;

    let task = &created["task"];
    assert_eq!(task["recurring"]["daysOfWeek"], json!([1, 3, 5]));
    assert_eq!(task["metrics"]["sets"], 5);
    assert_eq!(task["metrics"]["weight"], 80.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_toggle_sets_and_clears_completed_at() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let created = create_task(
        &app,
        &user.access_token,
        json!({ "title": "Drink water", "category": "hydration" }),
    )
    .await;
    let id = created["task"]["id"].as_str().unwrap().to_string();

    let (status, response) = app
        .patch_auth(&format!("/api/tasks/{}/toggle", id), &user.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["message"], "Task marked as completed");
    assert_eq!(response["task"]["completed"], true);
    assert!(response["task"]["completedAt"].is_string());

    let (_, response) = app
        .patch_auth(&format!("/api/tasks/{}/toggle", id), &user.access_token)
        .await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["message"], "Task marked as pending");
    assert_eq!(response["task"]["completed"], false);
    assert!(response["task"]["completedAt"].is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_preserves_completed_at_without_transition() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let created = create_task(
        &app,
        &user.access_token,
        json!({ "title": "Meditate", "category": "other" }),
    )
    .await;
    let id = created["task"]["id"].as_str().unwrap().to_string();

    let (_, response) = app
        .put_auth(
            &format!("/api/tasks/{}", id),
            &json!({ "completed": true }).to_string(),
            &user.access_token,
        )
        .await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let stamped = response["task"]["completedAt"].as_str().unwrap().to_string();

    // Completed stays true, so the stamp must not move
    let (_, response) = app
        .put_auth(
            &format!("/api/tasks/{}", id),
            &json!({ "completed": true, "title": "Meditate twice" }).to_string(),
            &user.access_token,
        )
        .await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["task"]["completedAt"], stamped.as_str());
    assert_eq!(response["task"]["title"], "Meditate twice");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_filters_and_pagination() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    for i in 0..15 {
        let category = if i % 2 == 0 { "workout" } else { "meal" };
        create_task(
            &app,
            &user.access_token,
            json!({ "title": format!("Task {}", i), "category": category }),
        )
        .await;
    }

    // Default page size is 10
    let (_, response) = app.get_auth("/api/tasks", &user.access_token).await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["tasks"].as_array().unwrap().len(), 10);
    assert_eq!(response["total"], 15);
    assert_eq!(response["page"], 1);
    assert_eq!(response["pages"], 2);

    // Second page holds the remainder
    let (_, response) = app.get_auth("/api/tasks?page=2", &user.access_token).await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["tasks"].as_array().unwrap().len(), 5);

    // Category filter
    let (_, response) = app
        .get_auth("/api/tasks?category=workout&limit=100", &user.access_token)
        .await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["total"], 8);

    // category=all means no filter
    let (_, response) = app
        .get_auth("/api/tasks?category=all&limit=100", &user.access_token)
        .await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["total"], 15);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_tasks_are_scoped_to_owner() {
    let app = common::TestApp::new().await;
    let owner = app.create_test_user().await;
    let other = app.create_test_user().await;

    let created = create_task(
        &app,
        &owner.access_token,
        json!({ "title": "Private", "category": "other" }),
    )
    .await;
    let id = created["task"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .get_auth(&format!("/api/tasks/{}", id), &other.access_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .delete_auth(&format!("/api/tasks/{}", id), &other.access_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_task() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let created = create_task(
        &app,
        &user.access_token,
        json!({ "title": "Ephemeral", "category": "other" }),
    )
    .await;
    let id = created["task"]["id"].as_str().unwrap().to_string();

    let (status, response) = app
        .delete_auth(&format!("/api/tasks/{}", id), &user.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["message"], "Task deleted successfully");

    let (status, _) = app
        .get_auth(&format!("/api/tasks/{}", id), &user.access_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_stats_summary() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    for i in 0..4 {
        let created = create_task(
            &app,
            &user.access_token,
            json!({ "title": format!("Task {}", i), "category": "hydration" }),
        )
        .await;
        if i < 3 {
            let id = created["task"]["id"].as_str().unwrap();
            app.patch_auth(&format!("/api/tasks/{}/toggle", id), &user.access_token)
                .await;
        }
    }

    let (status, response) = app
        .get_auth("/api/tasks/stats/summary", &user.access_token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let stats: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(stats["totalTasks"], 4);
    assert_eq!(stats["completedTasks"], 3);
    assert_eq!(stats["pendingTasks"], 1);
    assert_eq!(stats["todayTasks"], 4);
    assert_eq!(stats["todayCompletedTasks"], 3);
    assert_eq!(stats["completionRate"], 75.0);
    assert_eq!(stats["tasksByCategory"]["hydration"], 4);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_today_completed_counts_by_completion_time() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    // Both tasks were created two days ago; only one was finished today
    let done_today = create_task(
        &app,
        &user.access_token,
        json!({ "title": "Old task finished today", "category": "other" }),
    )
    .await;
    let done_then = create_task(
        &app,
        &user.access_token,
        json!({ "title": "Old task finished back then", "category": "other" }),
    )
    .await;
    for created in [&done_today, &done_then] {
        let id = created["task"]["id"].as_str().unwrap();
        app.patch_auth(&format!("/api/tasks/{}/toggle", id), &user.access_token)
            .await;
    }

    sqlx::query("UPDATE tasks SET created_at = NOW() - INTERVAL '2 days' WHERE id = $1::uuid")
        .bind(done_today["task"]["id"].as_str().unwrap())
        .execute(&app.pool)
        .await
        .unwrap();
    sqlx::query(
        "UPDATE tasks SET created_at = NOW() - INTERVAL '2 days', \
         completed_at = NOW() - INTERVAL '2 days' WHERE id = $1::uuid",
    )
    .bind(done_then["task"]["id"].as_str().unwrap())
    .execute(&app.pool)
    .await
    .unwrap();

    let (_, response) = app
        .get_auth("/api/tasks/stats/summary", &user.access_token)
        .await;
    let stats: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(stats["completedTasks"], 2);
    assert_eq!(stats["todayTasks"], 0);
    assert_eq!(stats["todayCompletedTasks"], 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_stats_empty_user_has_zero_rate() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (_, response) = app
        .get_auth("/api/tasks/stats/summary", &user.access_token)
        .await;
    let stats: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(stats["totalTasks"], 0);
    assert_eq!(stats["completionRate"], 0.0);
}
