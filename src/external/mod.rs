mod fallback;
mod nominatim;
mod openrouteservice;
mod osrm;

pub use fallback::FallbackDirections;
pub use nominatim::Nominatim;
pub use openrouteservice::OpenRouteService;
pub use osrm::Osrm;

use async_trait::async_trait;
use serde::Deserialize;

use crate::entities::{Coordinates, Place};
use crate::error::{upstream_error, Error};

pub const DEFAULT_PROFILE: &str = "driving-car";

/// One candidate route returned by a directions provider.
#[derive(Clone, Debug)]
pub struct RouteGeometry {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub coordinates: Vec<Coordinates>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a place name, returning `None` when nothing matches.
    async fn geocode(&self, query: &str) -> Result<Option<Place>, Error>;
}

#[async_trait]
pub trait Directions: Send + Sync {
    async fn find_routes(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        profile: &str,
        alternatives: u32,
    ) -> Result<Vec<RouteGeometry>, Error>;
}

/// GeoJSON line geometry, positions in `[lng, lat]` order.
#[derive(Debug, Default, Deserialize)]
struct LineGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

impl LineGeometry {
    fn into_coordinates(self) -> Vec<Coordinates> {
        self.coordinates
            .into_iter()
            .map(Coordinates::from_position)
            .collect()
    }
}

/// Turns a non-success response into an upstream error carrying the
/// provider's status and body.
async fn check_status(res: reqwest::Response, context: &str) -> Result<reqwest::Response, Error> {
    let status = res.status();

    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    Err(upstream_error(
        status.as_u16(),
        format!("{}: {}", context, body),
    ))
}

/// Prefixes transport errors with the failing call.
fn transport_error(context: &str, err: reqwest::Error) -> Error {
    let mut err = Error::from(err);
    err.message = format!("{}: {}", context, err.message);
    err
}
