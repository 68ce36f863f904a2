//! User account service: registration, login, token refresh

use crate::auth::{JwtService, PasswordService};
use crate::error::{ApiError, ApiResult};
use crate::repositories::UserRepository;
use health_hub_shared::types::AuthTokens;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

/// User account service
pub struct UserService;

impl UserService {
    /// Register a new user and issue tokens
    pub async fn register(
        pool: &PgPool,
        jwt: &JwtService,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthTokens> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Name is required".to_string()));
        }

        let email = normalize_email(email)?;

        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if UserRepository::find_by_email(pool, &email).await?.is_some() {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        let password_hash = PasswordService::hash_async(password.to_string()).await?;
        let user = UserRepository::create(pool, name, &email, &password_hash).await?;

        info!(user_id = %user.id, "User registered");

        Self::issue_tokens(jwt, user.id)
    }

    /// Authenticate with email and password
    pub async fn login(
        pool: &PgPool,
        jwt: &JwtService,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthTokens> {
        let email = normalize_email(email)?;

        // Same error for unknown email and wrong password
        let user = UserRepository::find_by_email(pool, &email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid =
            PasswordService::verify_async(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        Self::issue_tokens(jwt, user.id)
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(
        pool: &PgPool,
        jwt: &JwtService,
        refresh_token: &str,
    ) -> ApiResult<AuthTokens> {
        let claims = jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        // Tokens outlive account deletion, so re-check existence
        if UserRepository::find_by_id(pool, user_id).await?.is_none() {
            return Err(ApiError::Unauthorized("User no longer exists".to_string()));
        }

        Self::issue_tokens(jwt, user_id)
    }

    fn issue_tokens(jwt: &JwtService, user_id: Uuid) -> ApiResult<AuthTokens> {
        Ok(AuthTokens {
            access_token: jwt.generate_access_token(user_id)?,
            refresh_token: jwt.generate_refresh_token(user_id)?,
            token_type: "Bearer".to_string(),
            expires_in: jwt.access_token_expiry_secs(),
        })
    }
}

fn normalize_email(email: &str) -> ApiResult<String> {
    let email = email.trim().to_lowercase();
    // Light format check; the unique index is the real gate
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  User@Example.COM ").unwrap(),
            "user@example.com"
        );
        assert!(normalize_email("").is_err());
        assert!(normalize_email("not-an-email").is_err());
    }
}
