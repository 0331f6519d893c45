//! Overpass QL query construction and execution.
//!
//! A single query matches the caller's pattern case-insensitively against
//! three independent tag dimensions (`name`, `amenity`, `shop`) within a
//! radius of a coordinate. OSM tagging is an open vocabulary, so the match
//! ORs over all three; callers never need to know whether "cafe" is a name
//! or an amenity.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::OverpassConfig;
use crate::error::{PlacesError, Result};
use crate::geocode::GeoCoordinate;

/// One OSM node from an Overpass response. Only the tags matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

/// Searches a POI database around a coordinate.
#[async_trait]
pub trait PoiSource: Send + Sync {
    async fn search(
        &self,
        pattern: &str,
        radius_m: u32,
        at: GeoCoordinate,
        limit: usize,
    ) -> Result<Vec<OverpassElement>>;
}

/// Escape the caller's free text so it stays inside the QL string literal.
fn escape_pattern(pattern: &str) -> String {
    pattern.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Build the Overpass QL body: a union of name/amenity/shop regex matches
/// around `at`, server-side limited to `limit` results.
pub fn build_poi_query(
    pattern: &str,
    radius_m: u32,
    at: GeoCoordinate,
    limit: usize,
    server_timeout_secs: u64,
) -> String {
    let pattern = escape_pattern(pattern);
    let around = format!("around:{},{},{}", radius_m, at.latitude, at.longitude);
    format!(
        "[out:json][timeout:{server_timeout_secs}];\n(\n  \
         node[\"name\"~\"{pattern}\", i]({around});\n  \
         node[\"amenity\"~\"{pattern}\", i]({around});\n  \
         node[\"shop\"~\"{pattern}\", i]({around});\n);\n\
         out body {limit};"
    )
}

/// HTTP client for a public Overpass endpoint. Single attempt, no retry;
/// the orchestrator decides whether a failed lookup is worth re-invoking.
pub struct OverpassApi {
    client: reqwest::Client,
    endpoint: String,
    server_timeout_secs: u64,
}

impl OverpassApi {
    pub fn new(config: &OverpassConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            server_timeout_secs: config.server_timeout_secs,
        })
    }
}

#[async_trait]
impl PoiSource for OverpassApi {
    async fn search(
        &self,
        pattern: &str,
        radius_m: u32,
        at: GeoCoordinate,
        limit: usize,
    ) -> Result<Vec<OverpassElement>> {
        let query = build_poi_query(pattern, radius_m, at, limit, self.server_timeout_secs);
        tracing::debug!(endpoint = %self.endpoint, %pattern, radius_m, "querying Overpass");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Overpass request failed");
            return Err(PlacesError::UpstreamStatus(status.as_u16()));
        }

        let body: OverpassResponse = response.json().await?;
        Ok(body.elements)
    }
}
