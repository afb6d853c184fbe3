use axum::extract::State;
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use barberfinder_db::users::{self, UpsertUserParams};
use barberfinder_db::sessions;

use crate::auth::{self, AuthUser};
use crate::error::AppError;
use crate::extract::Json;
use crate::state::AppState;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Claims returned by Google's tokeninfo endpoint for a valid ID token
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    sub: String,
    aud: Option<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Deserialize)]
pub struct GoogleSignInRequest {
    credential: Option<String>,
}

/// POST /api/auth/google
///
/// Verifies a Google ID token, upserts the user, and issues a session
/// token the client sends back as a bearer token.
pub async fn google_sign_in(
    State(state): State<AppState>,
    Json(body): Json<GoogleSignInRequest>,
) -> Result<Json<Value>, AppError> {
    let credential = body
        .credential
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Google credential is required.".into()))?;

    let claims = verify_google_token(&credential).await.map_err(|e| {
        warn!(error = %e, "Google token verification failed");
        AppError::Unauthorized
    })?;

    // An ID token minted for another application is not ours to accept
    if let Some(expected) = &state.google_client_id {
        if claims.aud.as_deref() != Some(expected.as_str()) {
            warn!("Google token audience mismatch");
            return Err(AppError::Unauthorized);
        }
    }

    let user = users::upsert(
        &state.pool,
        &UpsertUserParams {
            google_id: claims.sub,
            email: claims.email.unwrap_or_default(),
            name: claims.name.unwrap_or_else(|| "Anonymous".to_string()),
            avatar: claims.picture,
        },
    )
    .await?;

    let session = sessions::create(&state.pool, &user.id).await?;

    info!(user_id = %user.id, "User signed in");

    Ok(Json(json!({
        "success": true,
        "token": session.token,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "avatar": user.avatar,
            "role": user.role,
        },
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    if let Some(token) = auth::bearer_token(&headers) {
        sessions::delete(&state.pool, token).await?;
    }
    Ok(Json(json!({ "success": true })))
}

/// GET /api/auth/me
pub async fn me(user: AuthUser) -> Json<Value> {
    Json(json!({
        "success": true,
        "user": {
            "id": user.user_id,
            "name": user.name,
            "email": user.email,
            "avatar": user.avatar,
            "role": user.role,
        },
    }))
}

/// Ask Google whether the ID token is genuine and fetch its claims
async fn verify_google_token(credential: &str) -> Result<GoogleTokenInfo, reqwest::Error> {
    let url = format!(
        "{}?id_token={}",
        TOKENINFO_URL,
        urlencoding::encode(credential)
    );

    let response = reqwest::Client::new()
        .get(&url)
        .send()
        .await?
        .error_for_status()?;

    response.json().await
}
