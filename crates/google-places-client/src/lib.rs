//! Rust client for the Google Places API.
//!
//! Thin, stateless adapter over the endpoints the shop directory needs:
//!
//! - `GET /nearbysearch/json` - nearby search around a coordinate
//! - `GET /textsearch/json` - free-text search
//! - `GET /details/json` - full place details
//! - `GET /photo` - photo bytes (streamed by the caller)
//!
//! Provider payloads are modeled as explicit optional-field structs so
//! downstream code never touches raw untyped JSON. A `ZERO_RESULTS` status
//! is a valid empty success; any other non-`OK` status is an error.

mod client;
mod error;
mod types;

pub use client::PlacesClient;
pub use error::{PlacesError, Result};
pub use types::{
    EditorialSummary, Geometry, LatLng, OpeningHours, PhotoMeta, PlaceDetails, PlaceResult,
    ProviderReview,
};
