use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use sqlx::SqlitePool;

use barberfinder_db::{sessions, users};

use crate::error::AppError;
use crate::state::AppState;

/// Identity resolved from a session token.
///
/// Carried per-request by parameter; there is no global auth state.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Axum extractor that validates the bearer token and returns an [`AuthUser`].
///
/// Use this as a handler parameter to require authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser, ...) -> Result<..., AppError> { ... }
/// ```
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_auth(&state.pool, &parts.headers).await
    }
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Validate the session token and load the user (required auth).
///
/// Missing or invalid tokens are `Unauthorized`; database failures
/// propagate as `Database` so an outage is never mistaken for a bad token.
pub async fn require_auth(pool: &SqlitePool, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;

    let session = sessions::get_valid(pool, token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let user = users::get(pool, &session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(AuthUser {
        user_id: user.id,
        name: user.name,
        email: user.email,
        avatar: user.avatar,
        role: user.role,
    })
}

/// Resolve the user if a valid token is present; guests pass through as `None`
pub async fn optional_user(
    pool: &SqlitePool,
    headers: &HeaderMap,
) -> Result<Option<AuthUser>, AppError> {
    match require_auth(pool, headers).await {
        Ok(user) => Ok(Some(user)),
        Err(AppError::Unauthorized) => Ok(None),
        Err(e) => Err(e),
    }
}
