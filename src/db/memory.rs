use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Store;
use crate::{
    entities::{Feedback, Route, Segment, SegmentDraft},
    error::{not_found_error, Error},
};

#[derive(Default)]
struct State {
    routes: HashMap<Uuid, Route>,
    fingerprints: HashMap<String, Uuid>,
    segments: Vec<Segment>,
    feedback: Vec<Feedback>,
}

/// In-process store used when no database is configured. Every operation
/// runs under one lock, so each is atomic. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn route_count(&self) -> usize {
        self.state.lock().await.routes.len()
    }

    pub async fn segment_count(&self) -> usize {
        self.state.lock().await.segments.len()
    }
}

fn mean(ratings: impl Iterator<Item = i32>) -> Option<f64> {
    let (total, count) = ratings.fold((0i64, 0i64), |(total, count), rating| {
        (total + rating as i64, count + 1)
    });

    if count == 0 {
        return None;
    }

    Some(total as f64 / count as f64)
}

#[async_trait]
impl Store for MemoryStore {
    #[tracing::instrument(skip(self, route), fields(fingerprint = %route.fingerprint))]
    async fn upsert_route(&self, mut route: Route) -> Result<Route, Error> {
        let mut state = self.state.lock().await;

        let existing = state
            .fingerprints
            .get(&route.fingerprint)
            .and_then(|id| state.routes.get(id));

        if let Some(existing) = existing {
            route.id = existing.id;
            route.segments = existing.segments.clone();
            route.created_at = existing.created_at;
        }

        state
            .fingerprints
            .insert(route.fingerprint.clone(), route.id);
        state.routes.insert(route.id, route.clone());

        Ok(route)
    }

    #[tracing::instrument(skip(self, drafts), fields(drafts = drafts.len()))]
    async fn attach_segments(
        &self,
        route_id: Uuid,
        drafts: Vec<SegmentDraft>,
    ) -> Result<Route, Error> {
        let mut state = self.state.lock().await;
        let state = &mut *state;

        let route = state
            .routes
            .get_mut(&route_id)
            .ok_or_else(|| not_found_error("route not found"))?;

        if route.has_segments() {
            return Ok(route.clone());
        }

        for draft in drafts {
            let segment = Segment::new(route.id, draft);
            route.segments.push(segment.id);
            state.segments.push(segment);
        }

        Ok(route.clone())
    }

    async fn find_route(&self, id: Uuid) -> Result<Option<Route>, Error> {
        Ok(self.state.lock().await.routes.get(&id).cloned())
    }

    async fn find_segments(&self, route_id: Uuid) -> Result<Vec<Segment>, Error> {
        let state = self.state.lock().await;

        Ok(state
            .segments
            .iter()
            .filter(|segment| segment.route_id == route_id)
            .cloned()
            .collect())
    }

    async fn update_safety_score(&self, route_id: Uuid, safety_score: f64) -> Result<(), Error> {
        let mut state = self.state.lock().await;

        if let Some(route) = state.routes.get_mut(&route_id) {
            route.safety_score = safety_score;
            route.updated_at = Utc::now();
        }

        Ok(())
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), Error> {
        let mut state = self.state.lock().await;

        if !state.routes.contains_key(&feedback.route_id) {
            return Err(not_found_error("route not found"));
        }

        state.feedback.push(feedback.clone());
        Ok(())
    }

    async fn average_rating(&self, route_id: Uuid) -> Result<Option<f64>, Error> {
        let state = self.state.lock().await;

        Ok(mean(
            state
                .feedback
                .iter()
                .filter(|feedback| feedback.route_id == route_id)
                .map(|feedback| feedback.rating),
        ))
    }

    async fn average_rating_between(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Option<f64>, Error> {
        let state = self.state.lock().await;

        Ok(mean(
            state
                .feedback
                .iter()
                .filter(|feedback| {
                    state.routes.get(&feedback.route_id).map_or(false, |route| {
                        route.source == source && route.destination == destination
                    })
                })
                .map(|feedback| feedback.rating),
        ))
    }

    async fn recent_feedback(
        &self,
        route_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Feedback>, Error> {
        let state = self.state.lock().await;

        // newest insertions first so equal timestamps keep that order
        let mut reviews: Vec<Feedback> = state
            .feedback
            .iter()
            .rev()
            .filter(|feedback| feedback.route_id == route_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = limit {
            reviews.truncate(limit.max(0) as usize);
        }

        Ok(reviews)
    }
}

#[cfg(test)]
fn sample_route(fingerprint: &str, score: f64) -> Route {
    use crate::entities::Coordinates;

    Route::new(
        fingerprint.into(),
        "Source".into(),
        "Destination".into(),
        1_000.0,
        120.0,
        vec![Coordinates::new(1.0, 2.0), Coordinates::new(1.1, 2.1)],
        score,
    )
}

#[cfg(test)]
fn sample_drafts(count: usize) -> Vec<SegmentDraft> {
    use crate::entities::{Coordinates, RiskInputs};

    (0..count)
        .map(|i| SegmentDraft {
            start: Coordinates::new(i as f64, 0.0),
            end: Coordinates::new(i as f64 + 1.0, 0.0),
            risk: RiskInputs::default(),
        })
        .collect()
}

#[test]
fn upsert_keeps_identity_and_segments() {
    use tokio_test::block_on;

    let store = MemoryStore::new();

    let first = block_on(store.upsert_route(sample_route("fp", 2.0))).unwrap();
    let attached = block_on(store.attach_segments(first.id, sample_drafts(3))).unwrap();
    assert_eq!(attached.segments.len(), 3);

    let second = block_on(store.upsert_route(sample_route("fp", 4.5))).unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.segments, attached.segments);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.safety_score, 4.5);

    assert_eq!(block_on(store.route_count()), 1);
}

#[test]
fn segments_attach_only_once() {
    use tokio_test::block_on;

    let store = MemoryStore::new();
    let route = block_on(store.upsert_route(sample_route("fp", 2.0))).unwrap();

    let first = block_on(store.attach_segments(route.id, sample_drafts(2))).unwrap();
    let second = block_on(store.attach_segments(route.id, sample_drafts(5))).unwrap();

    assert_eq!(first.segments, second.segments);
    assert_eq!(block_on(store.segment_count()), 2);
    assert_eq!(block_on(store.find_segments(route.id)).unwrap().len(), 2);
}

#[test]
fn averages_and_recent_feedback() {
    use tokio_test::block_on;

    let store = MemoryStore::new();
    let route = block_on(store.upsert_route(sample_route("fp", 2.0))).unwrap();
    let other = block_on(store.upsert_route(sample_route("other", 2.0))).unwrap();

    assert_eq!(block_on(store.average_rating(route.id)).unwrap(), None);

    for (rating, target) in [(5, route.id), (2, route.id), (3, other.id)] {
        let feedback = Feedback::new(target, "user".into(), rating, None);
        block_on(store.insert_feedback(&feedback)).unwrap();
    }

    assert_eq!(block_on(store.average_rating(route.id)).unwrap(), Some(3.5));
    assert_eq!(
        block_on(store.average_rating_between("Source", "Destination")).unwrap(),
        Some(10.0 / 3.0)
    );
    assert_eq!(
        block_on(store.average_rating_between("source", "Destination")).unwrap(),
        None
    );

    let recent = block_on(store.recent_feedback(route.id, Some(1))).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].rating, 2);

    let all = block_on(store.recent_feedback(route.id, None)).unwrap();
    assert_eq!(all.iter().map(|f| f.rating).collect::<Vec<_>>(), vec![2, 5]);
}

#[test]
fn feedback_for_unknown_route_is_rejected() {
    use axum::http::StatusCode;
    use tokio_test::block_on;

    let store = MemoryStore::new();
    let feedback = Feedback::new(Uuid::new_v4(), "user".into(), 4, None);

    let err = block_on(store.insert_feedback(&feedback)).unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
}
