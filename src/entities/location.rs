use geo_types::Coord;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds coordinates from a GeoJSON `[lng, lat]` position.
    pub fn from_position(position: [f64; 2]) -> Self {
        let [lng, lat] = position;
        Self { lat, lng }
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.lng,
            y: coordinates.lat,
        }
    }
}

impl From<Coord<f64>> for Coordinates {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

/// A geocoded place name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub coordinates: Coordinates,
    pub label: String,
}

#[test]
fn geojson_positions_are_lng_lat() {
    let coordinates = Coordinates::from_position([77.209, 28.6139]);
    assert_eq!(coordinates, Coordinates::new(28.6139, 77.209));

    let coord: Coord<f64> = coordinates.into();
    assert_eq!(coord.x, 77.209);
    assert_eq!(Coordinates::from(coord), coordinates);
}
