//! Free OpenStreetMap nearby-place lookup for LLM agent runtimes.
//!
//! The crate provides:
//! - A geocode-then-POI-search pipeline (`NearbyPlaceFinder`) over Nominatim
//!   and the Overpass API, no API keys required.
//! - A tool interface (`Tool` and `ToolRegistry`) so an orchestrator can
//!   invoke the pipeline as `find_nearby_places` with a textual result.
//!
//! Every failure path of the pipeline renders to a descriptive string; the
//! boundary never propagates an error to the calling reasoning loop.

mod config;
mod error;
mod geocode;
mod overpass;
mod places;
mod tool;
pub mod tools;

pub use config::{GeocoderConfig, OverpassConfig, PlacesConfig, SearchDefaults};
pub use error::{PlacesError, Result};
pub use geocode::{GeoCoordinate, Geocoder, Nominatim};
pub use overpass::{build_poi_query, OverpassApi, OverpassElement, PoiSource};
pub use places::{LookupResult, NearbyPlaceFinder, PlaceQuery, PlaceRecord};
pub use tool::{Tool, ToolDescription, ToolRegistry};
pub use tools::{places_toolkit, NearbyPlacesTool};
