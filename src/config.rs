use crate::constants::*;
use crate::models::Coordinate;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub mapbox_api_key: String,
    /// Override for the directions/search base URL (proxy or stub server).
    pub mapbox_base_url: Option<String>,
    pub search_radius_m: f64,
    pub segment_timeout_secs: u64,
    pub segment_cache_ttl: u64,
    /// Fallback device position for headless deployments; clients normally
    /// send their own coordinates with each request.
    pub device_location: Option<Coordinate>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let search_radius_m: f64 = env::var("SEARCH_RADIUS_M")
            .unwrap_or_else(|_| DEFAULT_SEARCH_RADIUS_METERS.to_string())
            .parse()
            .map_err(|_| "Invalid SEARCH_RADIUS_M")?;

        if search_radius_m <= 0.0 || search_radius_m > 100_000.0 {
            return Err("SEARCH_RADIUS_M must be between 0 and 100000 meters".to_string());
        }

        let segment_timeout_secs: u64 = env::var("SEGMENT_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_SEGMENT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| "Invalid SEGMENT_TIMEOUT_SECS")?;

        if !(1..=120).contains(&segment_timeout_secs) {
            return Err("SEGMENT_TIMEOUT_SECS must be between 1 and 120".to_string());
        }

        let device_location = match (env::var("DEVICE_LAT").ok(), env::var("DEVICE_LNG").ok()) {
            (Some(lat), Some(lng)) => {
                let lat: f64 = lat.parse().map_err(|_| "Invalid DEVICE_LAT")?;
                let lng: f64 = lng.parse().map_err(|_| "Invalid DEVICE_LNG")?;
                Some(Coordinate::new(lat, lng)?)
            }
            (None, None) => None,
            _ => return Err("DEVICE_LAT and DEVICE_LNG must be set together".to_string()),
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            mapbox_api_key: env::var("MAPBOX_API_KEY").map_err(|_| "MAPBOX_API_KEY must be set")?,
            mapbox_base_url: env::var("MAPBOX_BASE_URL").ok(),
            search_radius_m,
            segment_timeout_secs,
            segment_cache_ttl: env::var("SEGMENT_CACHE_TTL")
                .unwrap_or_else(|_| DEFAULT_SEGMENT_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid SEGMENT_CACHE_TTL")?,
            device_location,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
