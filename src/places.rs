//! Nearby-place lookup: geocode a location name, then search Overpass for
//! matching POIs around it.
//!
//! The finder's caller is a reasoning loop that consumes tool output as
//! text and cannot recover from a thrown fault mid-turn, so every failure
//! path renders to a descriptive string instead of propagating.

use crate::config::PlacesConfig;
use crate::error::{PlacesError, Result};
use crate::geocode::{Geocoder, Nominatim};
use crate::overpass::{OverpassApi, OverpassElement, PoiSource};

/// One lookup request. Constructed fresh per call; nothing is cached.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    /// Free text matched against POI name/amenity/shop tags.
    pub query: String,
    /// Free-text place name to search around.
    pub location: String,
    /// Search radius in meters.
    pub radius_m: u32,
    /// Maximum number of results to return.
    pub limit: usize,
}

impl PlaceQuery {
    /// A query with the stock defaults: 3000 m radius, 5 results.
    pub fn new(query: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: location.into(),
            radius_m: 3000,
            limit: 5,
        }
    }

    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A matched place, in upstream order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub name: String,
    pub street: Option<String>,
    pub city: Option<String>,
}

impl PlaceRecord {
    fn from_element(element: &OverpassElement) -> Self {
        let tag = |key: &str| {
            element
                .tags
                .get(key)
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
        };
        Self {
            name: tag("name").unwrap_or_else(|| "Unnamed place".to_string()),
            street: tag("addr:street"),
            city: tag("addr:city"),
        }
    }

    /// Street and city joined with a comma, skipping absent parts.
    pub fn address(&self) -> String {
        let parts: Vec<&str> = [self.street.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            "Address not available".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Typed outcome of one lookup. Exactly one variant per call; `render`
/// turns any of them into the text the orchestrator sees.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Found {
        query: String,
        location: String,
        places: Vec<PlaceRecord>,
    },
    LocationNotFound {
        location: String,
    },
    UpstreamError {
        status: u16,
    },
    NoMatches {
        query: String,
        location: String,
    },
}

impl LookupResult {
    pub fn render(&self) -> String {
        match self {
            LookupResult::Found {
                query,
                location,
                places,
            } => {
                let mut lines = vec![format!("Top results for '{query}' near {location}:")];
                for place in places {
                    lines.push(format!("- {} | {}", place.name, place.address()));
                }
                lines.join("\n")
            }
            LookupResult::LocationNotFound { location } => {
                format!("Could not find location '{location}'.")
            }
            LookupResult::UpstreamError { status } => format!("Overpass API error: {status}"),
            LookupResult::NoMatches { query, location } => {
                format!("No results found for '{query}' near {location}.")
            }
        }
    }
}

/// Geocode-then-POI-search pipeline over pluggable backends.
///
/// Stateless across calls; concurrent use needs no locking.
pub struct NearbyPlaceFinder {
    geocoder: Box<dyn Geocoder>,
    pois: Box<dyn PoiSource>,
}

impl NearbyPlaceFinder {
    /// Production wiring: Nominatim + a public Overpass endpoint.
    pub fn new(config: &PlacesConfig) -> Result<Self> {
        Ok(Self {
            geocoder: Box::new(Nominatim::new(&config.geocoder)?),
            pois: Box::new(OverpassApi::new(&config.overpass)?),
        })
    }

    /// Custom backends, mainly for tests.
    pub fn with_sources(geocoder: Box<dyn Geocoder>, pois: Box<dyn PoiSource>) -> Self {
        Self { geocoder, pois }
    }

    /// The typed lookup path. The POI query never runs without a resolved
    /// coordinate, and results are truncated to `limit` before formatting.
    pub async fn lookup(&self, query: &PlaceQuery) -> Result<LookupResult> {
        let coordinate = match self.geocoder.geocode(&query.location).await? {
            Some(coordinate) => coordinate,
            None => {
                return Ok(LookupResult::LocationNotFound {
                    location: query.location.clone(),
                })
            }
        };
        tracing::debug!(
            location = %query.location,
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "geocoded location"
        );

        let mut elements = match self
            .pois
            .search(&query.query, query.radius_m, coordinate, query.limit)
            .await
        {
            Ok(elements) => elements,
            Err(PlacesError::UpstreamStatus(status)) => {
                return Ok(LookupResult::UpstreamError { status })
            }
            Err(err) => return Err(err),
        };

        if elements.is_empty() {
            return Ok(LookupResult::NoMatches {
                query: query.query.clone(),
                location: query.location.clone(),
            });
        }

        elements.truncate(query.limit);
        Ok(LookupResult::Found {
            query: query.query.clone(),
            location: query.location.clone(),
            places: elements.iter().map(PlaceRecord::from_element).collect(),
        })
    }

    /// The boundary the orchestrator calls: always returns text, never an
    /// error. Anything `lookup` could not classify becomes the catch-all
    /// error sentence.
    pub async fn find(&self, query: &PlaceQuery) -> String {
        match self.lookup(query).await {
            Ok(result) => result.render(),
            Err(err) => format!(
                "Error searching for '{}' near '{}': {}",
                query.query, query.location, err
            ),
        }
    }
}
