//! Data types for Places API responses.
//!
//! Every field the provider may omit is an `Option`; defaults are applied
//! at the formatting layer, not here.

use serde::Deserialize;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Geometry block on a place result
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// Opening-hours block; `weekday_text` only appears on details responses
#[derive(Debug, Clone, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    pub weekday_text: Option<Vec<String>>,
}

/// Photo metadata; `photo_reference` is an opaque handle for the photo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoMeta {
    pub photo_reference: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// Free-text description block on details responses
#[derive(Debug, Clone, Deserialize)]
pub struct EditorialSummary {
    pub overview: Option<String>,
}

/// A review authored on the provider's platform
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderReview {
    pub author_name: Option<String>,
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub relative_time_description: Option<String>,
    pub profile_photo_url: Option<String>,
}

/// One result from nearby or text search
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    pub name: Option<String>,
    /// Present on nearby-search results
    pub vicinity: Option<String>,
    /// Present on text-search results
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    pub price_level: Option<i64>,
    pub photos: Option<Vec<PhotoMeta>>,
    pub opening_hours: Option<OpeningHours>,
    pub geometry: Option<Geometry>,
}

impl PlaceResult {
    /// Nearby results carry `vicinity`, text results `formatted_address`
    pub fn address(&self) -> Option<&str> {
        self.vicinity
            .as_deref()
            .or(self.formatted_address.as_deref())
    }

    /// Reference of the primary (first) photo, if any
    pub fn primary_photo_reference(&self) -> Option<&str> {
        self.photos
            .as_ref()
            .and_then(|p| p.first())
            .map(|p| p.photo_reference.as_str())
    }

    pub fn open_now(&self) -> Option<bool> {
        self.opening_hours.as_ref().and_then(|h| h.open_now)
    }
}

/// Full place details from `/details/json`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    pub price_level: Option<i64>,
    pub opening_hours: Option<OpeningHours>,
    pub photos: Option<Vec<PhotoMeta>>,
    pub editorial_summary: Option<EditorialSummary>,
    pub types: Option<Vec<String>>,
    pub geometry: Option<Geometry>,
    pub reviews: Option<Vec<ProviderReview>>,
    /// Link to the place on the provider's own maps site
    pub url: Option<String>,
}

/// Envelope for search responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    pub error_message: Option<String>,
}

/// Envelope for details responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DetailsResponse {
    pub status: String,
    pub result: Option<PlaceDetails>,
}
