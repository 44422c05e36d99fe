use async_trait::async_trait;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{Coordinates, Feedback, Route};
use crate::error::Error;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteSearch {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub profile: Option<String>,
}

/// A route as shown to the user after a search.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOption {
    pub id: Uuid,
    pub source: String,
    pub destination: String,
    pub distance: String,
    pub duration: String,
    pub safety_score: f64,
    pub coordinates: Vec<Coordinates>,
    pub reviews: Vec<Review>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_id: String,
    pub rating: i32,
    pub comment: Option<String>,
}

impl From<Feedback> for Review {
    fn from(feedback: Feedback) -> Self {
        Self {
            user_id: feedback.user_id,
            rating: feedback.rating,
            comment: feedback.comment,
        }
    }
}

impl RouteOption {
    pub fn new(route: Route, reviews: Vec<Feedback>) -> Self {
        Self {
            id: route.id,
            distance: route.distance_label(),
            duration: route.duration_label(),
            source: route.source,
            destination: route.destination,
            safety_score: route.safety_score,
            coordinates: route.coordinates,
            reviews: reviews.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub user_id: Option<String>,
    pub route_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// Accepts a rating as a JSON integer, an integral float or a numeric string.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let rating = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(None),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok().and_then(|f| {
            if f.is_finite() && f.fract() == 0.0 {
                Some(f as i64)
            } else {
                None
            }
        }),
        Some(_) => None,
    };

    rating
        .and_then(|rating| i32::try_from(rating).ok())
        .map(Some)
        .ok_or_else(|| de::Error::custom("rating must be a whole number"))
}

#[async_trait]
pub trait RouteAPI {
    /// Geocodes both places, fetches candidate routes, scores and stores them.
    /// Results are ordered safest first.
    async fn find_routes(&self, search: RouteSearch) -> Result<Vec<RouteOption>, Error>;
}

#[async_trait]
pub trait FeedbackAPI {
    /// Records feedback and rescores the route it refers to.
    async fn add_feedback(&self, submission: FeedbackSubmission) -> Result<Feedback, Error>;

    /// Every review of a route, newest first.
    async fn find_feedback(&self, route_id: Uuid) -> Result<Vec<Feedback>, Error>;
}

pub trait API: RouteAPI + FeedbackAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;

#[test]
fn rating_accepts_numeric_strings() {
    let parse = |body: &str| serde_json::from_str::<FeedbackSubmission>(body).map(|s| s.rating);

    assert_eq!(parse(r#"{"rating": 4}"#).unwrap(), Some(4));
    assert_eq!(parse(r#"{"rating": "5"}"#).unwrap(), Some(5));
    assert_eq!(parse(r#"{"rating": 3.0}"#).unwrap(), Some(3));
    assert_eq!(parse(r#"{"rating": null}"#).unwrap(), None);
    assert_eq!(parse(r#"{}"#).unwrap(), None);
    assert!(parse(r#"{"rating": "five"}"#).is_err());
    assert!(parse(r#"{"rating": 4.5}"#).is_err());
    assert!(parse(r#"{"rating": [5]}"#).is_err());
}
