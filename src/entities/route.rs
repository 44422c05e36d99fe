use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Uuid,
    pub fingerprint: String,
    pub source: String,
    pub destination: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub coordinates: Vec<Coordinates>,
    pub safety_score: f64,
    pub segments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Route {
    pub fn new(
        fingerprint: String,
        source: String,
        destination: String,
        distance_meters: f64,
        duration_seconds: f64,
        coordinates: Vec<Coordinates>,
        safety_score: f64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            fingerprint,
            source,
            destination,
            distance_meters,
            duration_seconds,
            coordinates,
            safety_score,
            segments: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Distance for display, e.g. `12.3 km`.
    pub fn distance_label(&self) -> String {
        format!("{} km", (self.distance_meters / 1000.0 * 10.0).round() / 10.0)
    }

    /// Duration for display, e.g. `17 mins`.
    pub fn duration_label(&self) -> String {
        format!("{} mins", (self.duration_seconds / 60.0).round())
    }
}

#[test]
fn display_labels() {
    let route = Route::new(
        "fp".into(),
        "a".into(),
        "b".into(),
        12_345.0,
        1_020.0,
        vec![],
        3.0,
    );

    assert_eq!(route.distance_label(), "12.3 km");
    assert_eq!(route.duration_label(), "17 mins");

    let route = Route {
        distance_meters: 4_000.0,
        duration_seconds: 29.0,
        ..route
    };

    assert_eq!(route.distance_label(), "4 km");
    assert_eq!(route.duration_label(), "0 mins");
}
