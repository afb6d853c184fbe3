//! Places API HTTP client

use std::time::Duration;

use tracing::debug;

use crate::error::{PlacesError, Result};
use crate::types::{DetailsResponse, PlaceDetails, PlaceResult, SearchResponse};

/// Fields requested from the details endpoint
const DETAILS_FIELDS: &str = "name,rating,user_ratings_total,formatted_address,\
formatted_phone_number,website,opening_hours,photos,price_level,\
editorial_summary,types,geometry,reviews,url";

/// Client for the Google Places API.
///
/// Holds the server-side API key; the key is appended to outbound requests
/// and must never be forwarded to browser clients (the photo endpoint
/// exists precisely so it doesn't have to be).
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    /// Default base URL for the Places web service
    pub const DEFAULT_BASE_URL: &'static str = "https://maps.googleapis.com/maps/api/place";

    /// Timeout for photo streaming requests; bounds the hold on a stalled
    /// upstream connection
    const PHOTO_TIMEOUT: Duration = Duration::from_secs(12);

    /// Create a new client with default settings (30 second timeout)
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, Self::DEFAULT_BASE_URL)
    }

    /// Create a new client against a custom base URL
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Nearby search around a coordinate, scoped to barber shops.
    ///
    /// `ZERO_RESULTS` is a valid empty success; any other non-`OK` status
    /// becomes [`PlacesError::Upstream`].
    pub async fn nearby_search(
        &self,
        lat: f64,
        lng: f64,
        radius_meters: u32,
    ) -> Result<Vec<PlaceResult>> {
        let url = format!(
            "{}/nearbysearch/json?location={},{}&radius={}&type=hair_care&keyword=barber&key={}",
            self.base_url, lat, lng, radius_meters, self.api_key
        );

        debug!(lat, lng, radius_meters, "nearby search against places API");

        let response: SearchResponse = self.http.get(&url).send().await?.json().await?;
        search_results(response)
    }

    /// Free-text search. The query is rewritten with a category qualifier
    /// ("barber shops near ...") to bias results toward barber shops.
    pub async fn text_search(&self, query: &str, radius_meters: u32) -> Result<Vec<PlaceResult>> {
        let rewritten = format!("barber shops near {}", query);
        let url = format!(
            "{}/textsearch/json?query={}&type=hair_care&radius={}&key={}",
            self.base_url,
            urlencoding::encode(&rewritten),
            radius_meters,
            self.api_key
        );

        debug!(query, radius_meters, "text search against places API");

        let response: SearchResponse = self.http.get(&url).send().await?.json().await?;
        search_results(response)
    }

    /// Full details for a place id.
    ///
    /// Any non-`OK` status means the provider could not resolve the id and
    /// becomes [`PlacesError::NotFound`] carrying the upstream status.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        let url = format!(
            "{}/details/json?place_id={}&fields={}&key={}",
            self.base_url,
            urlencoding::encode(place_id),
            DETAILS_FIELDS,
            self.api_key
        );

        let response: DetailsResponse = self.http.get(&url).send().await?.json().await?;

        if response.status != "OK" {
            return Err(PlacesError::NotFound(format!(
                "Google Places error: {}",
                response.status
            )));
        }

        response
            .result
            .ok_or_else(|| PlacesError::NotFound("Google Places error: empty result".into()))
    }

    /// Fetch a photo by reference, returning the raw response so the caller
    /// can stream the body without buffering it.
    pub async fn photo(&self, photo_reference: &str, max_width: u32) -> Result<reqwest::Response> {
        let url = format!(
            "{}/photo?maxwidth={}&photo_reference={}&key={}",
            self.base_url,
            max_width,
            urlencoding::encode(photo_reference),
            self.api_key
        );

        let response = self
            .http
            .get(&url)
            .timeout(Self::PHOTO_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlacesError::Upstream(format!(
                "photo endpoint returned status {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

/// Apply the shared search status contract to a decoded search envelope
fn search_results(response: SearchResponse) -> Result<Vec<PlaceResult>> {
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(response.results),
        status => {
            let detail = response
                .error_message
                .map(|m| format!("{status}: {m}"))
                .unwrap_or_else(|| status.to_string());
            Err(PlacesError::Upstream(detail))
        }
    }
}
