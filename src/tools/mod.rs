//! Tools module - toolkits an agent runtime can register.
//!
//! Currently a single toolkit: nearby-place search over free
//! OpenStreetMap services.

pub mod places;

pub use places::{places_toolkit, NearbyPlacesTool};
