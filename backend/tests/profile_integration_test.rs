//! Integration tests for profile and BMI endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_get_profile_requires_auth() {
    let app = common::TestApp::new().await;

    let (status, _) = app.get("/api/users/profile").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_get_profile_success() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/users/profile", &user.access_token).await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["email"], user.email);
    assert!(response.get("currentBMI").is_none() || response["currentBMI"].is_null());
    assert!(response.get("password").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_profile_ignores_email_and_password() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({
        "name": "Renamed",
        "email": "other@example.com",
        "password": "hijacked",
        "age": 30
    });
    let (status, response) = app
        .put_auth("/api/users/profile", &body.to_string(), &user.access_token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["user"]["name"], "Renamed");
    assert_eq!(response["user"]["age"], 30);
    // Email unchanged despite the key in the body
    assert_eq!(response["user"]["email"], user.email);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_profile_invalid_age() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "age": 0 });
    let (status, _) = app
        .put_auth("/api/users/profile", &body.to_string(), &user.access_token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_bmi_update_appends_history() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "weight": 81.0, "height": 180.0 });
    let (status, response) = app
        .put_auth("/api/users/bmi", &body.to_string(), &user.access_token)
        .await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["currentBMI"], 25.0);
    assert_eq!(response["bmiHistory"].as_array().unwrap().len(), 1);

    // A second update appends rather than replaces
    let body = json!({ "weight": 80.0, "height": 180.0 });
    let (_, response) = app
        .put_auth("/api/users/bmi", &body.to_string(), &user.access_token)
        .await;
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["bmiHistory"].as_array().unwrap().len(), 2);
    // Newest first
    assert_eq!(response["bmiHistory"][0]["weight"], 80.0);

    // Profile now derives the new BMI
    let (_, profile) = app.get_auth("/api/users/profile", &user.access_token).await;
    let profile: serde_json::Value = serde_json::from_str(&profile).unwrap();
    assert_eq!(profile["currentBMI"], 24.7);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_bmi_update_requires_both_fields() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "weight": 81.0 });
    let (status, response) = app
        .put_auth("/api/users/bmi", &body.to_string(), &user.access_token)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["message"], "Weight and height are required");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_history_preview_caps_at_ten() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let mut last = String::new();
    for i in 0..12 {
        let body = json!({ "weight": 70.0 + i as f64, "height": 175.0 });
        let (_, response) = app
            .put_auth("/api/users/bmi", &body.to_string(), &user.access_token)
            .await;
        last = response;
    }

    let response: serde_json::Value = serde_json::from_str(&last).unwrap();
    assert_eq!(response["bmiHistory"].as_array().unwrap().len(), 10);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_profile_weight_change_appends_history() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    // Height alone records nothing
    let body = json!({ "height": 180.0 });
    app.put_auth("/api/users/profile", &body.to_string(), &user.access_token)
        .await;
    let (_, history) = app
        .get_auth("/api/users/bmi-history", &user.access_token)
        .await;
    let history: serde_json::Value = serde_json::from_str(&history).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 0);

    // Changing weight with height present appends one entry
    let body = json!({ "weight": 81.0 });
    app.put_auth("/api/users/profile", &body.to_string(), &user.access_token)
        .await;
    let (status, history) = app
        .get_auth("/api/users/bmi-history", &user.access_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let history: serde_json::Value = serde_json::from_str(&history).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["bmi"], 25.0);

    // Re-saving the same weight is not a change
    let body = json!({ "weight": 81.0 });
    app.put_auth("/api/users/profile", &body.to_string(), &user.access_token)
        .await;
    let (_, history) = app
        .get_auth("/api/users/bmi-history", &user.access_token)
        .await;
    let history: serde_json::Value = serde_json::from_str(&history).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_calculate_bmi_is_public() {
    let app = common::TestApp::new().await;

    let body = json!({ "weight": 70.0, "height": 175.0 });
    let (status, response) = app.post("/api/users/calculate-bmi", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["bmi"], 22.9);
    assert_eq!(response["category"], "Normal weight");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_calculate_bmi_rejects_non_positive() {
    let app = common::TestApp::new().await;

    let body = json!({ "weight": -70.0, "height": 175.0 });
    let (status, _) = app.post("/api/users/calculate-bmi", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_registration_conflicts() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({
        "name": "Dup",
        "email": user.email,
        "password": "another-password"
    });
    let (status, _) = app.post("/api/auth/register", &body.to_string()).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_refresh_accepts_login_response_token() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "email": user.email, "password": user.password });
    let (_, response) = app.post("/api/auth/login", &body.to_string()).await;
    let tokens: serde_json::Value = serde_json::from_str(&response).unwrap();

    // The login payload round-trips into the refresh request unchanged
    let body = json!({ "refreshToken": tokens["refreshToken"] });
    let (status, response) = app.post("/api/auth/refresh", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let refreshed: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert!(refreshed["accessToken"].is_string());
    assert!(refreshed["refreshToken"].is_string());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_wrong_password_unauthorized() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "email": user.email, "password": "wrong" });
    let (status, _) = app.post("/api/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
