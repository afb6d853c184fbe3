use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use barberfinder_db::reviews;
use google_places_client::PlaceDetails;

use crate::error::AppError;
use crate::extract::Query;
use crate::search::{self, Location};
use crate::state::AppState;
use crate::validation;

// Query parameters arrive as raw strings; the validation layer parses
// them so malformed values produce the standard error envelope.
#[derive(Deserialize)]
pub struct NearbyParams {
    lat: Option<String>,
    lng: Option<String>,
    radius: Option<String>,
}

/// GET /api/shops/nearby
pub async fn nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Value>, AppError> {
    let (lat, lng) = validation::validate_coordinates(params.lat.as_deref(), params.lng.as_deref())?;
    let radius = validation::radius_or_default(params.radius.as_deref())?;

    let shops = search::nearby_shops(&state, lat, lng, radius).await?;

    Ok(Json(json!({
        "success": true,
        "count": shops.len(),
        "data": shops,
    })))
}

#[derive(Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    radius: Option<String>,
}

/// GET /api/shops/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, AppError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("query is required.".into()))?;
    let radius = validation::radius_or_default(params.radius.as_deref())?;

    let shops = search::search_shops(&state, query, radius).await?;

    Ok(Json(json!({
        "success": true,
        "count": shops.len(),
        "data": shops,
    })))
}

/// Photo metadata exposed on details responses
#[derive(Serialize)]
struct PhotoEntry {
    reference: String,
    width: Option<i64>,
    height: Option<i64>,
}

/// A review authored on the provider's platform, reshaped for the client
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProviderReviewEntry {
    author_name: Option<String>,
    rating: Option<f64>,
    text: Option<String>,
    relative_time: Option<String>,
    profile_photo: Option<String>,
}

/// Full shop details: provider data enriched with the local review count
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShopDetailsBody {
    place_id: String,
    name: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    rating: Option<f64>,
    user_ratings_total: i64,
    price_level: Option<i64>,
    is_open: Option<bool>,
    opening_hours: Vec<String>,
    description: Option<String>,
    types: Vec<String>,
    google_maps_url: Option<String>,
    location: Option<Location>,
    photos: Vec<PhotoEntry>,
    google_reviews: Vec<ProviderReviewEntry>,
    our_review_count: i64,
}

impl ShopDetailsBody {
    fn build(place_id: String, details: PlaceDetails, our_review_count: i64) -> Self {
        Self {
            place_id,
            name: details.name,
            address: details.formatted_address,
            phone: details.formatted_phone_number,
            website: details.website,
            rating: details.rating,
            user_ratings_total: details.user_ratings_total.unwrap_or(0),
            price_level: details.price_level,
            is_open: details.opening_hours.as_ref().and_then(|h| h.open_now),
            opening_hours: details
                .opening_hours
                .and_then(|h| h.weekday_text)
                .unwrap_or_default(),
            description: details.editorial_summary.and_then(|s| s.overview),
            types: details.types.unwrap_or_default(),
            google_maps_url: details.url,
            location: details.geometry.map(|g| Location {
                lat: g.location.lat,
                lng: g.location.lng,
            }),
            photos: details
                .photos
                .unwrap_or_default()
                .into_iter()
                .take(10)
                .map(|p| PhotoEntry {
                    reference: p.photo_reference,
                    width: p.width,
                    height: p.height,
                })
                .collect(),
            google_reviews: details
                .reviews
                .unwrap_or_default()
                .into_iter()
                .take(5)
                .map(|r| ProviderReviewEntry {
                    author_name: r.author_name,
                    rating: r.rating,
                    text: r.text,
                    relative_time: r.relative_time_description,
                    profile_photo: r.profile_photo_url,
                })
                .collect(),
            our_review_count,
        }
    }
}

/// GET /api/shops/{place_id}/details
pub async fn details(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let details = state.places.place_details(&place_id).await?;
    let our_review_count = reviews::count_for_place(&state.pool, &place_id).await?;

    let body = ShopDetailsBody::build(place_id, details, our_review_count);
    Ok(Json(json!({ "success": true, "data": body })))
}

#[derive(Deserialize)]
pub struct PhotoParams {
    #[serde(rename = "photoReference")]
    photo_reference: Option<String>,
    #[serde(rename = "maxWidth")]
    max_width: Option<String>,
}

/// GET /api/shops/photo
///
/// Streams the provider photo body straight through (never buffered), so
/// the API key stays server-side and image loads avoid cross-origin issues.
pub async fn photo(
    State(state): State<AppState>,
    Query(params): Query<PhotoParams>,
) -> Result<Response, AppError> {
    let reference = params
        .photo_reference
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::BadRequest("photoReference is required.".into()))?;
    // Unparseable widths fall back to the default rather than failing the image load
    let max_width = params
        .max_width
        .as_deref()
        .and_then(|w| w.trim().parse::<u32>().ok())
        .filter(|w| *w > 0)
        .unwrap_or(800);

    let upstream = state.places.photo(&reference, max_width).await?;

    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::routes::router;
    use crate::test_util::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use barberfinder_db::{shops, UpsertShopParams};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn cached_shop(place_id: &str, lat: f64, lng: f64) -> UpsertShopParams {
        UpsertShopParams {
            place_id: place_id.to_string(),
            name: "Fade Factory".to_string(),
            address: Some("1 Mall Road".to_string()),
            rating: Some(4.5),
            user_ratings_total: 12,
            price_level: Some(2),
            photo_reference: Some("ref-1".to_string()),
            is_open: Some(true),
            latitude: lat,
            longitude: lng,
        }
    }

    #[tokio::test]
    async fn nearby_requires_coordinates() {
        let app = router(test_state().await);
        let (status, json) = get_json(app, "/api/shops/nearby?lat=31.52").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "lat and lng are required.");
    }

    #[tokio::test]
    async fn nearby_rejects_non_positive_radius() {
        let app = router(test_state().await);
        let (status, _) = get_json(app, "/api/shops/nearby?lat=31.52&lng=74.36&radius=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_coordinates_get_error_envelope() {
        let app = router(test_state().await);
        let (status, json) = get_json(app, "/api/shops/nearby?lat=abc&lng=74.36").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "lat and lng must be valid numbers.");
    }

    #[tokio::test]
    async fn malformed_radius_gets_error_envelope() {
        let app = router(test_state().await);
        let (status, json) =
            get_json(app, "/api/shops/nearby?lat=31.52&lng=74.36&radius=lots").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "radius must be a positive integer.");
    }

    #[tokio::test]
    async fn nearby_serves_cached_shops() {
        let state = test_state().await;
        shops::upsert(&state.pool, &cached_shop("abc123", 31.52, 74.36))
            .await
            .unwrap();

        // Provider is unreachable, so a 200 can only come from the cache
        let (status, json) = get_json(
            router(state),
            "/api/shops/nearby?lat=31.5204&lng=74.3587&radius=5000",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"][0]["placeId"], "abc123");
        assert_eq!(json["data"][0]["name"], "Fade Factory");
        assert_eq!(json["data"][0]["location"]["lat"], 31.52);
    }

    #[tokio::test]
    async fn nearby_miss_with_dead_provider_returns_error_envelope() {
        let app = router(test_state().await);
        let (status, json) = get_json(app, "/api/shops/nearby?lat=31.52&lng=74.36").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["success"], false);
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn search_requires_query() {
        let app = router(test_state().await);
        let (status, json) = get_json(app, "/api/shops/search?query=%20%20").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "query is required.");
    }

    #[tokio::test]
    async fn photo_requires_reference() {
        let app = router(test_state().await);
        let (status, json) = get_json(app, "/api/shops/photo").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "photoReference is required.");
    }
}
