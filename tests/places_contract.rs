//! Behavioral contract of the nearby-place finder, exercised end to end
//! against stub backends so no network is involved.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use osm_places::{
    GeoCoordinate, Geocoder, LookupResult, NearbyPlaceFinder, NearbyPlacesTool, OverpassElement,
    PlaceQuery, PlacesConfig, PlacesError, PoiSource, Result, ToolRegistry,
};

const PARIS: GeoCoordinate = GeoCoordinate {
    latitude: 48.8566,
    longitude: 2.3522,
};

struct FixedGeocoder(Option<GeoCoordinate>);

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _location: &str) -> Result<Option<GeoCoordinate>> {
        Ok(self.0)
    }
}

struct FailingGeocoder;

#[async_trait]
impl Geocoder for FailingGeocoder {
    async fn geocode(&self, _location: &str) -> Result<Option<GeoCoordinate>> {
        Err(PlacesError::Geocode("connection reset".into()))
    }
}

struct FixedPois {
    elements: Vec<OverpassElement>,
    called: Arc<AtomicBool>,
}

impl FixedPois {
    fn new(elements: Vec<OverpassElement>) -> Self {
        Self {
            elements,
            called: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl PoiSource for FixedPois {
    async fn search(
        &self,
        _pattern: &str,
        _radius_m: u32,
        _at: GeoCoordinate,
        _limit: usize,
    ) -> Result<Vec<OverpassElement>> {
        self.called.store(true, Ordering::SeqCst);
        Ok(self.elements.clone())
    }
}

struct StatusPois(u16);

#[async_trait]
impl PoiSource for StatusPois {
    async fn search(
        &self,
        _pattern: &str,
        _radius_m: u32,
        _at: GeoCoordinate,
        _limit: usize,
    ) -> Result<Vec<OverpassElement>> {
        Err(PlacesError::UpstreamStatus(self.0))
    }
}

fn element(tags: &[(&str, &str)]) -> OverpassElement {
    OverpassElement {
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    }
}

fn finder(geocoder: impl Geocoder + 'static, pois: impl PoiSource + 'static) -> NearbyPlaceFinder {
    NearbyPlaceFinder::with_sources(Box::new(geocoder), Box::new(pois))
}

#[tokio::test]
async fn unresolved_location_is_terminal() {
    let f = finder(FixedGeocoder(None), FixedPois::new(vec![]));
    let out = f.find(&PlaceQuery::new("cafe", "Nowhereland")).await;
    assert_eq!(out, "Could not find location 'Nowhereland'.");
}

#[tokio::test]
async fn poi_search_never_runs_without_a_coordinate() {
    let pois = FixedPois::new(vec![element(&[("name", "Cafe Lumo")])]);
    let called = pois.called.clone();
    let f = finder(FixedGeocoder(None), pois);
    f.find(&PlaceQuery::new("cafe", "Nowhereland")).await;
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn upstream_status_is_reported_verbatim() {
    let f = finder(FixedGeocoder(Some(PARIS)), StatusPois(503));
    let out = f.find(&PlaceQuery::new("cafe", "Paris")).await;
    assert_eq!(out, "Overpass API error: 503");
}

#[tokio::test]
async fn empty_result_names_query_and_location() {
    let f = finder(FixedGeocoder(Some(PARIS)), FixedPois::new(vec![]));
    let out = f.find(&PlaceQuery::new("unicorn stable", "Paris")).await;
    assert_eq!(out, "No results found for 'unicorn stable' near Paris.");
}

#[tokio::test]
async fn results_are_truncated_to_limit() {
    let elements: Vec<OverpassElement> = (0..7)
        .map(|i| element(&[("name", format!("Cafe {i}").as_str())]))
        .collect();
    let f = finder(FixedGeocoder(Some(PARIS)), FixedPois::new(elements));
    let out = f.find(&PlaceQuery::new("cafe", "Paris")).await;

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Top results for 'cafe' near Paris:");
    assert_eq!(lines.len(), 6);
    assert!(lines[1..].iter().all(|line| line.starts_with("- ")));
}

#[tokio::test]
async fn records_keep_upstream_order_and_format() {
    let f = finder(
        FixedGeocoder(Some(PARIS)),
        FixedPois::new(vec![
            element(&[
                ("name", "Cafe Lumo"),
                ("addr:street", "Rue A"),
                ("addr:city", "Paris"),
            ]),
            element(&[("amenity", "cafe")]),
        ]),
    );
    let out = f.find(&PlaceQuery::new("cafe", "Paris")).await;
    assert_eq!(
        out,
        "Top results for 'cafe' near Paris:\n\
         - Cafe Lumo | Rue A, Paris\n\
         - Unnamed place | Address not available"
    );
}

#[tokio::test]
async fn backend_failures_become_text() {
    let f = finder(FailingGeocoder, FixedPois::new(vec![]));
    let out = f.find(&PlaceQuery::new("cafe", "Paris")).await;
    assert_eq!(
        out,
        "Error searching for 'cafe' near 'Paris': geocoding failed: connection reset"
    );
}

#[tokio::test]
async fn repeated_calls_are_deterministic() {
    let query = PlaceQuery::new("cafe", "Paris");
    let build = || {
        finder(
            FixedGeocoder(Some(PARIS)),
            FixedPois::new(vec![
                element(&[("name", "Cafe Lumo")]),
                element(&[("name", "Cafe Mira")]),
            ]),
        )
    };
    let first = build().find(&query).await;
    let second = build().find(&query).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn typed_lookup_exposes_the_variant() {
    let f = finder(FixedGeocoder(Some(PARIS)), StatusPois(429));
    let result = f.lookup(&PlaceQuery::new("cafe", "Paris")).await.unwrap();
    assert_eq!(result, LookupResult::UpstreamError { status: 429 });
}

#[tokio::test]
async fn tool_call_returns_text_through_the_registry() {
    let config = PlacesConfig::default();
    let f = finder(
        FixedGeocoder(Some(PARIS)),
        FixedPois::new(vec![element(&[("name", "Cafe Lumo")])]),
    );

    let mut registry = ToolRegistry::new();
    registry.register(NearbyPlacesTool::with_finder(f, &config));

    let out = registry
        .call(
            "find_nearby_places",
            json!({"query": "cafe", "location": "Paris", "limit": 1}),
        )
        .await
        .unwrap();
    assert_eq!(
        out,
        Value::String(
            "Top results for 'cafe' near Paris:\n- Cafe Lumo | Address not available".into()
        )
    );
}
