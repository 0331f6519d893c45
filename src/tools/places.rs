//! Nearby-places toolkit.
//!
//! Exposes the [`NearbyPlaceFinder`] pipeline as a registrable tool with a
//! text-in/text-out contract, keyless end to end (Nominatim + Overpass).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{PlacesConfig, SearchDefaults};
use crate::error::{PlacesError, Result};
use crate::places::{NearbyPlaceFinder, PlaceQuery};
use crate::tool::{Tool, ToolRegistry};

/// Create a toolkit with the nearby-place search tool.
pub fn places_toolkit(config: &PlacesConfig) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(NearbyPlacesTool::new(config)?);
    Ok(registry)
}

#[derive(Debug, Deserialize)]
struct NearbyPlacesInput {
    query: String,
    location: String,
    #[serde(default)]
    radius: Option<u32>,
    #[serde(default)]
    limit: Option<usize>,
}

pub struct NearbyPlacesTool {
    finder: NearbyPlaceFinder,
    defaults: SearchDefaults,
}

impl NearbyPlacesTool {
    pub fn new(config: &PlacesConfig) -> Result<Self> {
        Ok(Self {
            finder: NearbyPlaceFinder::new(config)?,
            defaults: config.search.clone(),
        })
    }

    /// Swap in a pre-built finder, mainly for tests.
    pub fn with_finder(finder: NearbyPlaceFinder, config: &PlacesConfig) -> Self {
        Self {
            finder,
            defaults: config.search.clone(),
        }
    }
}

#[async_trait]
impl Tool for NearbyPlacesTool {
    fn name(&self) -> &str {
        "find_nearby_places"
    }

    fn description(&self) -> &str {
        "Find real-world places (restaurants, hotels, shops, ...) near a named location using free OpenStreetMap data. Expects {\"query\": string, \"location\": string, \"radius\": meters (optional), \"limit\": number (optional)}."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "What to look for, e.g. \"restaurant\", \"hospital\", \"gym\""},
                "location": {"type": "string", "description": "City or area to search in"},
                "radius": {"type": "integer", "description": "Search radius in meters (default 3000)"},
                "limit": {"type": "integer", "description": "Number of results to show (default 5)"}
            },
            "required": ["query", "location"]
        }))
    }

    async fn call(&self, input: Value) -> Result<Value> {
        let input: NearbyPlacesInput = serde_json::from_value(input).map_err(|err| {
            PlacesError::Protocol(format!("Invalid find_nearby_places input: {err}"))
        })?;
        if input.query.is_empty() {
            return Err(PlacesError::Protocol(
                "empty `query` for find_nearby_places".into(),
            ));
        }
        if input.location.is_empty() {
            return Err(PlacesError::Protocol(
                "empty `location` for find_nearby_places".into(),
            ));
        }

        let query = PlaceQuery::new(input.query, input.location)
            .with_radius(input.radius.unwrap_or(self.defaults.radius_m))
            .with_limit(input.limit.unwrap_or(self.defaults.limit));

        // The finder renders every outcome to text; the orchestrator always
        // gets a string back from a well-formed call.
        Ok(Value::String(self.finder.find(&query).await))
    }
}
