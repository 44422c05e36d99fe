use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;

/// Environmental risk inputs of a segment, each expected in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInputs {
    pub lighting: f64,
    pub traffic: f64,
    pub crime_index: f64,
}

impl Default for RiskInputs {
    fn default() -> Self {
        Self {
            lighting: 0.5,
            traffic: 0.5,
            crime_index: 0.5,
        }
    }
}

/// A segment that has been generated for a route but not stored yet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentDraft {
    pub start: Coordinates,
    pub end: Coordinates,
    pub risk: RiskInputs,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: Uuid,
    pub route_id: Uuid,
    pub start: Coordinates,
    pub end: Coordinates,
    #[serde(flatten)]
    pub risk: RiskInputs,
    pub created_at: DateTime<Utc>,
}

impl Segment {
    pub fn new(route_id: Uuid, draft: SegmentDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id,
            start: draft.start,
            end: draft.end,
            risk: draft.risk,
            created_at: Utc::now(),
        }
    }
}
