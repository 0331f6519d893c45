//! Free-text place name to coordinate resolution via Nominatim.
//!
//! Keyless: the public Nominatim instance only asks for an identifying
//! User-Agent, which comes from [`GeocoderConfig`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::error::{PlacesError, Result};

/// A WGS84 coordinate produced by geocoding.
///
/// Latitude is in [-90, 90], longitude in [-180, 180]; values are taken
/// as-is from the geocoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolves a free-text location name to a coordinate.
///
/// `Ok(None)` is the normal "no such place" answer, not an error.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, location: &str) -> Result<Option<GeoCoordinate>>;
}

/// Nominatim `/search` response row. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimRow {
    lat: String,
    lon: String,
}

/// HTTP geocoder backed by a Nominatim instance.
pub struct Nominatim {
    client: reqwest::Client,
    endpoint: String,
}

impl Nominatim {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for Nominatim {
    async fn geocode(&self, location: &str) -> Result<Option<GeoCoordinate>> {
        let url = format!("{}/search", self.endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|err| PlacesError::Geocode(err.to_string()))?;

        if !response.status().is_success() {
            return Err(PlacesError::Geocode(format!(
                "geocoder returned status {}",
                response.status().as_u16()
            )));
        }

        let rows: Vec<NominatimRow> = response
            .json()
            .await
            .map_err(|err| PlacesError::Geocode(err.to_string()))?;

        match rows.first() {
            None => Ok(None),
            Some(row) => Ok(Some(parse_row(row)?)),
        }
    }
}

fn parse_row(row: &NominatimRow) -> Result<GeoCoordinate> {
    let latitude = row
        .lat
        .parse::<f64>()
        .map_err(|_| PlacesError::Geocode(format!("non-numeric latitude `{}`", row.lat)))?;
    let longitude = row
        .lon
        .parse::<f64>()
        .map_err(|_| PlacesError::Geocode(format!("non-numeric longitude `{}`", row.lon)))?;
    Ok(GeoCoordinate {
        latitude,
        longitude,
    })
}
