mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Feedback, Route, Segment, SegmentDraft};
use crate::error::Error;

/// Document storage for routes, their segments and user feedback.
#[async_trait]
pub trait Store: Send + Sync {
    /// Creates or overwrites the route with the same fingerprint. An existing
    /// route keeps its id, creation time and segment list.
    async fn upsert_route(&self, route: Route) -> Result<Route, Error>;

    /// Stores the drafts as the route's segments unless it already has some.
    /// The check and the write happen atomically.
    async fn attach_segments(
        &self,
        route_id: Uuid,
        drafts: Vec<SegmentDraft>,
    ) -> Result<Route, Error>;

    async fn find_route(&self, id: Uuid) -> Result<Option<Route>, Error>;

    async fn find_segments(&self, route_id: Uuid) -> Result<Vec<Segment>, Error>;

    async fn update_safety_score(&self, route_id: Uuid, safety_score: f64) -> Result<(), Error>;

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), Error>;

    /// Mean rating of a route's feedback, `None` without feedback.
    async fn average_rating(&self, route_id: Uuid) -> Result<Option<f64>, Error>;

    /// Mean rating over every route stored for exactly this source and
    /// destination text.
    async fn average_rating_between(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Option<f64>, Error>;

    /// Feedback for a route, newest first, at most `limit` entries.
    async fn recent_feedback(
        &self,
        route_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Feedback>, Error>;
}
