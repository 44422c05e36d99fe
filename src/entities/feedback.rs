use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user review of a route. Feedback is append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub route_id: Uuid,
    pub user_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(route_id: Uuid, user_id: String, rating: i32, comment: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id,
            user_id,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}
