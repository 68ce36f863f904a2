//! Authentication routes
//!
//! Registration, login, and token refresh. Password work runs on the
//! blocking thread pool inside the service.

use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use health_hub_shared::types::{AuthTokens, LoginRequest, RegisterRequest};
use serde::Deserialize;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
}

/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens =
        UserService::register(&state.db, state.jwt(), &req.name, &req.email, &req.password)
            .await?;
    Ok(Json(tokens))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::login(&state.db, state.jwt(), &req.email, &req.password).await?;
    Ok(Json(tokens))
}

/// Refresh token request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// POST /api/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::refresh_token(&state.db, state.jwt(), &req.refresh_token).await?;
    Ok(Json(tokens))
}
