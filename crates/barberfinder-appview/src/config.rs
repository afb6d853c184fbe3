use std::env;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub cors_origins: Vec<String>,
    pub google_maps_api_key: String,
    pub google_client_id: Option<String>,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://barberfinder.db?mode=rwc".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["http://localhost:5173".to_string()]);

        let google_maps_api_key = env::var("GOOGLE_MAPS_API_KEY").unwrap_or_default();

        let google_client_id = env::var("GOOGLE_CLIENT_ID").ok();

        Self {
            port,
            database_url,
            cors_origins,
            google_maps_api_key,
            google_client_id,
        }
    }
}
