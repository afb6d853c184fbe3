//! Opaque bearer-token sessions.
//!
//! Identity is request-scoped: route handlers resolve the token from the
//! Authorization header against this table instead of holding any global
//! auth state.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::types::SessionRow;

/// Session lifetime
const SESSION_TTL_DAYS: i64 = 7;

/// Create a new session for a user and return its token
pub async fn create(
    executor: impl sqlx::SqliteExecutor<'_>,
    user_id: &str,
) -> Result<SessionRow, sqlx::Error> {
    let row = SessionRow {
        token: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
    };

    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)")
        .bind(&row.token)
        .bind(&row.user_id)
        .bind(row.expires_at)
        .execute(executor)
        .await?;

    Ok(row)
}

/// Look up a session by token; expired sessions resolve to `None`
pub async fn get_valid(
    executor: impl sqlx::SqliteExecutor<'_>,
    token: &str,
) -> Result<Option<SessionRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE token = ?1")
        .bind(token)
        .fetch_optional(executor)
        .await?;

    Ok(row.filter(|s| s.expires_at > Utc::now()))
}

/// Delete a session (logout)
pub async fn delete(
    executor: impl sqlx::SqliteExecutor<'_>,
    token: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?1")
        .bind(token)
        .execute(executor)
        .await?;
    Ok(())
}
