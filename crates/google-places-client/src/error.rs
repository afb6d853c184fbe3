//! Error types for the Places API client

use std::fmt;

/// Errors that can occur when interacting with the Places API
#[derive(Debug)]
pub enum PlacesError {
    /// HTTP request or body decode failed
    Http(reqwest::Error),
    /// Provider reported a non-success status (carries the upstream status)
    Upstream(String),
    /// Provider could not resolve the requested place id
    NotFound(String),
}

impl fmt::Display for PlacesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Places HTTP error: {}", e),
            Self::Upstream(status) => write!(f, "Places API error: {}", status),
            Self::NotFound(msg) => write!(f, "Place not found: {}", msg),
        }
    }
}

impl std::error::Error for PlacesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PlacesError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// Result type for Places API operations
pub type Result<T> = std::result::Result<T, PlacesError>;
