//! User profile and BMI routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use health_hub_shared::models::BmiHistoryEntry;
use health_hub_shared::types::{
    BmiUpdateResponse, CalculateBmiRequest, CalculateBmiResponse, ProfileResponse,
    ProfileUpdateResponse, UpdateBmiRequest, UpdateProfileRequest,
};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/bmi", put(update_bmi))
        .route("/bmi-history", get(get_bmi_history))
        .route("/calculate-bmi", post(calculate_bmi))
}

/// GET /api/users/profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = ProfileService::get_profile(state.db(), auth.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/users/profile
///
/// Partial update; email and password are not accepted here and any such
/// keys in the body are ignored.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileUpdateResponse>> {
    let profile = ProfileService::update_profile(state.db(), auth.user_id, req).await?;
    Ok(Json(ProfileUpdateResponse {
        message: "Profile updated successfully".to_string(),
        user: profile,
    }))
}

/// PUT /api/users/bmi
///
/// Stores weight and height, appends the derived BMI to history, and echoes
/// the 10 newest history entries.
async fn update_bmi(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateBmiRequest>,
) -> ApiResult<Json<BmiUpdateResponse>> {
    let response = ProfileService::update_biometrics(state.db(), auth.user_id, req).await?;
    Ok(Json(response))
}

/// GET /api/users/bmi-history
///
/// The full append-only history, newest first.
async fn get_bmi_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<BmiHistoryEntry>>> {
    let history = ProfileService::get_bmi_history(state.db(), auth.user_id).await?;
    Ok(Json(history))
}

/// POST /api/users/calculate-bmi
///
/// Stateless calculator; deliberately unauthenticated and writes nothing.
async fn calculate_bmi(
    Json(req): Json<CalculateBmiRequest>,
) -> ApiResult<Json<CalculateBmiResponse>> {
    let response = ProfileService::calculate_bmi(req)?;
    Ok(Json(response))
}
