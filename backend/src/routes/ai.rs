//! AI generation routes
//!
//! Thin relays into the plan service. All three answer 503 when no API key
//! is configured, and 200 with a `rawResponse` payload when the model reply
//! cannot be parsed.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::PlanService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use health_hub_shared::types::{
    AiContentResponse, MealPlanRequest, RecommendationsRequest, WorkoutPlanRequest,
};

/// Create AI routes
pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plan", post(meal_plan))
        .route("/workout-plan", post(workout_plan))
        .route("/recommendations", post(recommendations))
}

/// POST /api/ai/meal-plan
async fn meal_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MealPlanRequest>,
) -> ApiResult<Json<AiContentResponse>> {
    let response = PlanService::meal_plan(state.db(), state.ai(), auth.user_id, req).await?;
    Ok(Json(response))
}

/// POST /api/ai/workout-plan
async fn workout_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<WorkoutPlanRequest>,
) -> ApiResult<Json<AiContentResponse>> {
    let response = PlanService::workout_plan(state.db(), state.ai(), auth.user_id, req).await?;
    Ok(Json(response))
}

/// POST /api/ai/recommendations
async fn recommendations(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RecommendationsRequest>,
) -> ApiResult<Json<AiContentResponse>> {
    let response = PlanService::recommendations(state.db(), state.ai(), auth.user_id, req).await?;
    Ok(Json(response))
}
