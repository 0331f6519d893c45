use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlacesError, Result};

/// Settings for the Nominatim geocoding round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    /// Nominatim's usage policy requires an identifying User-Agent.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

fn default_geocoder_endpoint() -> String {
    "https://nominatim.openstreetmap.org".into()
}

fn default_user_agent() -> String {
    "osm-places/0.1".into()
}

fn default_geocoder_timeout() -> u64 {
    10
}

/// Settings for the Overpass POI query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_endpoint")]
    pub endpoint: String,
    /// Timeout the Overpass server applies while evaluating the query,
    /// embedded in the query header itself.
    #[serde(default = "default_server_timeout")]
    pub server_timeout_secs: u64,
    /// Client-side bound on the whole HTTP round-trip.
    #[serde(default = "default_overpass_timeout")]
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: default_overpass_endpoint(),
            server_timeout_secs: default_server_timeout(),
            timeout_secs: default_overpass_timeout(),
        }
    }
}

fn default_overpass_endpoint() -> String {
    "https://overpass-api.de/api/interpreter".into()
}

fn default_server_timeout() -> u64 {
    25
}

fn default_overpass_timeout() -> u64 {
    30
}

/// Defaults applied when a caller omits radius or limit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchDefaults {
    #[serde(default = "default_radius")]
    pub radius_m: u32,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            radius_m: default_radius(),
            limit: default_limit(),
        }
    }
}

fn default_radius() -> u32 {
    3000
}

fn default_limit() -> usize {
    5
}

/// Process-wide configuration, built once at startup and passed by reference
/// to the components that need it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlacesConfig {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub overpass: OverpassConfig,
    #[serde(default)]
    pub search: SearchDefaults,
}

impl PlacesConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&raw)
            .map_err(|err| PlacesError::Protocol(format!("Failed to parse configuration: {err}")))?;
        Ok(cfg)
    }

    pub fn from_env_or_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut cfg = Self::from_file(path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Environment overrides on top of whatever the file (or defaults) gave us.
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = env::var("OSM_PLACES_GEOCODER_ENDPOINT") {
            self.geocoder.endpoint = endpoint;
        }
        if let Ok(agent) = env::var("OSM_PLACES_USER_AGENT") {
            self.geocoder.user_agent = agent;
        }
        if let Ok(endpoint) = env::var("OSM_PLACES_OVERPASS_ENDPOINT") {
            self.overpass.endpoint = endpoint;
        }
        if let Ok(radius) = env::var("OSM_PLACES_RADIUS_M") {
            if let Ok(parsed) = radius.parse::<u32>() {
                self.search.radius_m = parsed;
            }
        }
        if let Ok(limit) = env::var("OSM_PLACES_LIMIT") {
            if let Ok(parsed) = limit.parse::<usize>() {
                self.search.limit = parsed;
            }
        }
    }
}
