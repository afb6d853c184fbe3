use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cached shop row returned from SELECT queries.
///
/// `cached_at` is unix seconds: it is only ever compared against a
/// freshness cutoff, never rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShopRow {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: i64,
    pub price_level: Option<i64>,
    pub photo_reference: Option<String>,
    pub is_open: Option<bool>,
    pub latitude: f64,
    pub longitude: f64,
    pub cached_at: i64,
}

/// Parameters for upserting a cached shop
#[derive(Debug, Clone)]
pub struct UpsertShopParams {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: i64,
    pub price_level: Option<i64>,
    pub photo_reference: Option<String>,
    pub is_open: Option<bool>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Review row returned from SELECT queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRow {
    pub id: String,
    pub place_id: String,
    pub shop_name: String,
    pub author_name: String,
    pub rating: i64,
    pub comment: String,
    pub avatar_color: String,
    pub user_id: Option<String>,
    pub user_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for inserting a review
#[derive(Debug, Clone)]
pub struct NewReviewParams {
    pub place_id: String,
    pub shop_name: String,
    pub author_name: String,
    pub rating: i64,
    pub comment: String,
    pub avatar_color: String,
    pub user_id: Option<String>,
    pub user_avatar: Option<String>,
}

/// Signed-in user row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Session row (opaque bearer token)
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}
