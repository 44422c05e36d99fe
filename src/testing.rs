//! Stub providers and engine wiring for tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::SearchConfig,
    db::MemoryStore,
    engine::Engine,
    entities::{Coordinates, Place, RiskInputs},
    error::{upstream_error, Error},
    external::{Directions, Geocoder, RouteGeometry},
    risk::FixedRiskSource,
};

pub struct StubGeocoder {
    places: HashMap<String, Coordinates>,
}

impl StubGeocoder {
    pub fn new(places: &[(&str, Coordinates)]) -> Self {
        Self {
            places: places
                .iter()
                .map(|(name, coordinates)| (name.to_string(), *coordinates))
                .collect(),
        }
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Place>, Error> {
        Ok(self.places.get(query).map(|coordinates| Place {
            coordinates: *coordinates,
            label: query.into(),
        }))
    }
}

pub enum StubDirections {
    Routes(Vec<RouteGeometry>),
    Failing(u16),
}

#[async_trait]
impl Directions for StubDirections {
    async fn find_routes(
        &self,
        _origin: &Coordinates,
        _destination: &Coordinates,
        _profile: &str,
        _alternatives: u32,
    ) -> Result<Vec<RouteGeometry>, Error> {
        match self {
            Self::Routes(routes) => Ok(routes.clone()),
            Self::Failing(status) => Err(upstream_error(*status, "Directions failed: stub")),
        }
    }
}

/// Risk inputs of a perfectly safe segment: fully lit, no traffic, no crime.
pub fn safe_risk() -> RiskInputs {
    RiskInputs {
        lighting: 1.0,
        traffic: 0.0,
        crime_index: 0.0,
    }
}

pub fn straight_route(distance_meters: f64, points: usize) -> RouteGeometry {
    RouteGeometry {
        distance_meters,
        duration_seconds: distance_meters / 10.0,
        coordinates: (0..points)
            .map(|i| Coordinates::new(28.6, 77.2 + i as f64 * 0.001))
            .collect(),
    }
}

pub fn places() -> StubGeocoder {
    StubGeocoder::new(&[
        ("Connaught Place", Coordinates::new(28.6315, 77.2167)),
        ("India Gate", Coordinates::new(28.6129, 77.2295)),
    ])
}

pub fn engine(store: Arc<MemoryStore>, directions: StubDirections) -> Engine {
    Engine::new(
        store,
        Arc::new(places()),
        Arc::new(directions),
        Arc::new(FixedRiskSource(safe_risk())),
        SearchConfig::default(),
    )
}
