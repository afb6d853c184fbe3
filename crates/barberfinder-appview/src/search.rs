//! Cache-aside search over the places provider.
//!
//! Coordinate searches check the geospatial shop cache first and only fall
//! through to the provider on a miss; provider results are written back
//! concurrently, with per-record failures isolated from each other and from
//! the response. Text searches always hit the provider (free-text queries
//! have no stable geographic key for the cache) but still write back.

use chrono::{Duration, Utc};
use futures::future::join_all;
use google_places_client::PlaceResult;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use barberfinder_db::shops;
use barberfinder_db::{ShopRow, UpsertShopParams};

use crate::error::AppError;
use crate::state::AppState;

/// Maximum age of a cached shop before it stops being served
const CACHE_TTL_HOURS: i64 = 12;

/// Cap on records served from the cache per query
const CACHE_RESULT_LIMIT: usize = 20;

/// A shop formatted for API consumers.
///
/// The key set is stable: fields the provider omitted are `null` (or `0`
/// for the ratings count), never missing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSummary {
    pub place_id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: i64,
    pub price_level: Option<i64>,
    pub is_open: Option<bool>,
    pub photo_reference: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl ShopSummary {
    /// Format a raw provider result
    pub fn from_provider(place: &PlaceResult) -> Self {
        Self {
            place_id: place.place_id.clone(),
            name: place.name.clone(),
            address: place.address().map(String::from),
            rating: place.rating,
            user_ratings_total: place.user_ratings_total.unwrap_or(0),
            price_level: place.price_level,
            is_open: place.open_now(),
            photo_reference: place.primary_photo_reference().map(String::from),
            location: place.geometry.map(|g| Location {
                lat: g.location.lat,
                lng: g.location.lng,
            }),
        }
    }

    /// Format a cached row
    pub fn from_row(row: ShopRow) -> Self {
        Self {
            place_id: row.place_id,
            name: Some(row.name),
            address: row.address,
            rating: row.rating,
            user_ratings_total: row.user_ratings_total,
            price_level: row.price_level,
            is_open: row.is_open,
            photo_reference: row.photo_reference,
            location: Some(Location {
                lat: row.latitude,
                lng: row.longitude,
            }),
        }
    }
}

/// Nearby search with cache-aside semantics.
///
/// A non-empty cache result is served as-is: cached and fresh records are
/// never mixed within one response.
pub async fn nearby_shops(
    state: &AppState,
    lat: f64,
    lng: f64,
    radius_meters: u32,
) -> Result<Vec<ShopSummary>, AppError> {
    let cached_since = (Utc::now() - Duration::hours(CACHE_TTL_HOURS)).timestamp();

    let cached = shops::find_within_radius(
        &state.pool,
        lat,
        lng,
        radius_meters as f64,
        cached_since,
        CACHE_RESULT_LIMIT,
    )
    .await?;

    if !cached.is_empty() {
        debug!(count = cached.len(), "serving nearby shops from cache");
        return Ok(cached.into_iter().map(ShopSummary::from_row).collect());
    }

    info!(lat, lng, radius_meters, "cache miss, fetching from places API");
    let results = state.places.nearby_search(lat, lng, radius_meters).await?;

    write_back(&state.pool, &results).await;

    Ok(results.iter().map(ShopSummary::from_provider).collect())
}

/// Text search: always goes to the provider, results are still cached
pub async fn search_shops(
    state: &AppState,
    query: &str,
    radius_meters: u32,
) -> Result<Vec<ShopSummary>, AppError> {
    let results = state.places.text_search(query, radius_meters).await?;

    write_back(&state.pool, &results).await;

    Ok(results.iter().map(ShopSummary::from_provider).collect())
}

/// Upsert provider results into the cache, all writes dispatched
/// concurrently and joined before returning.
///
/// Failures are logged and swallowed per record: cache population is a
/// best-effort side effect and must never fail the search that spawned it.
async fn write_back(pool: &SqlitePool, results: &[PlaceResult]) {
    let writes = results.iter().filter_map(cache_params).map(|p| async move {
        if let Err(e) = shops::upsert(pool, &p).await {
            warn!(place_id = %p.place_id, error = %e, "shop cache write failed");
        }
    });

    join_all(writes).await;
}

/// Map a provider result onto upsert parameters.
///
/// Records without a name or coordinate cannot satisfy the cache schema
/// and are skipped; they still appear in the response.
fn cache_params(place: &PlaceResult) -> Option<UpsertShopParams> {
    let name = place.name.clone()?;
    let geometry = place.geometry?;

    Some(UpsertShopParams {
        place_id: place.place_id.clone(),
        name,
        address: place.address().map(String::from),
        rating: place.rating,
        user_ratings_total: place.user_ratings_total.unwrap_or(0),
        price_level: place.price_level,
        photo_reference: place.primary_photo_reference().map(String::from),
        is_open: place.open_now(),
        latitude: geometry.location.lat,
        longitude: geometry.location.lng,
    })
}
