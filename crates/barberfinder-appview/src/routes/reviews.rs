use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use barberfinder_db::reviews;
use barberfinder_db::NewReviewParams;

use crate::auth::{self, AuthUser};
use crate::error::AppError;
use crate::extract::Json;
use crate::state::AppState;
use crate::validation::validate_string_length;

/// Palette for generated reviewer avatars
const AVATAR_COLORS: [&str; 8] = [
    "#2dd4bf", "#06b6d4", "#3b82f6", "#8b5cf6", "#ec4899", "#f59e0b", "#10b981", "#f97316",
];

/// Deterministic avatar color from the author's name
fn color_for_name(name: &str) -> &'static str {
    let first = name.bytes().next().unwrap_or(0) as usize;
    AVATAR_COLORS[first % AVATAR_COLORS.len()]
}

/// GET /api/reviews/{place_id}
pub async fn list(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let rows = reviews::list_for_place(&state.pool, &place_id, 50).await?;

    Ok(Json(json!({
        "success": true,
        "count": rows.len(),
        "data": rows,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    author_name: Option<String>,
    rating: Option<i64>,
    comment: Option<String>,
    shop_name: Option<String>,
}

/// POST /api/reviews/{place_id}
///
/// Guests may review; a signed-in author is recorded so they can delete
/// their own reviews later.
pub async fn create(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let author_name = required_trimmed(body.author_name.as_deref(), "authorName")?;
    let comment = required_trimmed(body.comment.as_deref(), "comment")?;
    let shop_name = required_trimmed(body.shop_name.as_deref(), "shopName")?;

    validate_string_length(&author_name, 1, 60, "authorName")?;
    validate_string_length(&comment, 1, 800, "comment")?;

    let rating = match body.rating {
        Some(r) if (1..=5).contains(&r) => r,
        _ => return Err(AppError::BadRequest("rating must be 1-5.".into())),
    };

    let user = auth::optional_user(&state.pool, &headers).await?;

    let row = reviews::insert(
        &state.pool,
        &NewReviewParams {
            place_id,
            shop_name,
            avatar_color: color_for_name(&author_name).to_string(),
            author_name,
            rating,
            comment,
            user_id: user.as_ref().map(|u| u.user_id.clone()),
            user_avatar: user.and_then(|u| u.avatar),
        },
    )
    .await?;

    info!(review_id = %row.id, place_id = %row.place_id, "Created review");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": row })),
    ))
}

/// DELETE /api/reviews/{review_id}
///
/// Only the review's author or an admin may delete an attributed review.
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let review = reviews::get(&state.pool, &review_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found.".into()))?;

    if let Some(owner_id) = &review.user_id {
        if *owner_id != user.user_id && !user.is_admin() {
            return Err(AppError::Forbidden(
                "Not authorized to delete this review.".into(),
            ));
        }
    }

    reviews::delete(&state.pool, &review_id).await?;

    Ok(Json(json!({ "success": true, "message": "Review deleted." })))
}

fn required_trimmed(value: Option<&str>, field_name: &str) -> Result<String, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::BadRequest(format!("{field_name} is required.")))
}
