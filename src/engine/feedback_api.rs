use super::helpers::present;
use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{FeedbackAPI, FeedbackSubmission},
    entities::Feedback,
    error::{invalid_input_error, not_found_error, Error},
    scoring::calculate_safety_score,
};

#[async_trait]
impl FeedbackAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn add_feedback(&self, submission: FeedbackSubmission) -> Result<Feedback, Error> {
        let rating = submission.rating.filter(|rating| *rating != 0);

        let (user_id, route_id, rating) = match (
            present(submission.user_id),
            present(submission.route_id),
            rating,
        ) {
            (Some(user_id), Some(route_id), Some(rating)) => (user_id, route_id, rating),
            _ => return Err(invalid_input_error("userId, routeId, rating are required")),
        };

        if !(1..=5).contains(&rating) {
            return Err(invalid_input_error("rating must be between 1 and 5"));
        }

        let route_id = Uuid::parse_str(route_id.trim())
            .map_err(|_| invalid_input_error("routeId is not a valid route id"))?;

        let route = self
            .store
            .find_route(route_id)
            .await?
            .ok_or_else(|| not_found_error("route not found"))?;

        let feedback = Feedback::new(route.id, user_id, rating, submission.comment);
        self.store.insert_feedback(&feedback).await?;

        let average_rating = self.store.average_rating(route.id).await?.unwrap_or(0.0);
        let segments = self.store.find_segments(route.id).await?;
        let safety_score =
            calculate_safety_score(average_rating, segments.iter().map(|segment| &segment.risk));

        self.store
            .update_safety_score(route.id, safety_score)
            .await?;

        tracing::info!("route {} rescored to {}", route.id, safety_score);

        Ok(feedback)
    }

    #[tracing::instrument(skip(self))]
    async fn find_feedback(&self, route_id: Uuid) -> Result<Vec<Feedback>, Error> {
        self.store.recent_feedback(route_id, None).await
    }
}

#[cfg(test)]
fn submission(route_id: &str, rating: i32) -> FeedbackSubmission {
    FeedbackSubmission {
        user_id: Some("user-1".into()),
        route_id: Some(route_id.into()),
        rating: Some(rating),
        comment: Some("well lit".into()),
    }
}

#[test]
fn feedback_rescores_route() {
    use crate::api::{RouteAPI, RouteSearch};
    use crate::db::{MemoryStore, Store};
    use crate::testing::{engine, straight_route, StubDirections};
    use std::sync::Arc;
    use tokio_test::block_on;

    let store = Arc::new(MemoryStore::new());
    let engine = engine(
        store.clone(),
        StubDirections::Routes(vec![straight_route(5_000.0, 4)]),
    );

    let search = RouteSearch {
        source: Some("Connaught Place".into()),
        destination: Some("India Gate".into()),
        profile: None,
    };

    let options = block_on(engine.find_routes(search.clone())).unwrap();
    assert_eq!(options[0].safety_score, 2.0);
    let route_id = options[0].id;

    // 0.6 * 4 + 0.4 * 5
    block_on(engine.add_feedback(submission(&route_id.to_string(), 4))).unwrap();
    let route = block_on(store.find_route(route_id)).unwrap().unwrap();
    assert_eq!(route.safety_score, 4.4);

    // average 3 -> 0.6 * 3 + 0.4 * 5
    block_on(engine.add_feedback(submission(&route_id.to_string(), 2))).unwrap();
    let route = block_on(store.find_route(route_id)).unwrap().unwrap();
    assert_eq!(route.safety_score, 3.8);

    // a new search blends in the ratings given for this place pair
    let options = block_on(engine.find_routes(search)).unwrap();
    assert_eq!(options[0].id, route_id);
    assert_eq!(options[0].safety_score, 3.8);
    assert_eq!(options[0].reviews.len(), 2);
    assert_eq!(options[0].reviews[0].rating, 2);
}

#[test]
fn invalid_feedback_is_rejected() {
    use crate::db::MemoryStore;
    use crate::testing::{engine, StubDirections};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tokio_test::block_on;

    let engine = engine(Arc::new(MemoryStore::new()), StubDirections::Routes(vec![]));
    let unknown = Uuid::new_v4().to_string();

    let cases = vec![
        (FeedbackSubmission::default(), StatusCode::BAD_REQUEST),
        (submission(&unknown, 0), StatusCode::BAD_REQUEST),
        (submission(&unknown, 6), StatusCode::BAD_REQUEST),
        (submission("not-an-id", 3), StatusCode::BAD_REQUEST),
        (submission(&unknown, 3), StatusCode::NOT_FOUND),
    ];

    for (submission, status) in cases {
        let err = block_on(engine.add_feedback(submission)).unwrap_err();
        assert_eq!(err.status, status);
    }
}

#[test]
fn feedback_is_listed_newest_first() {
    use crate::api::{RouteAPI, RouteSearch};
    use crate::db::MemoryStore;
    use crate::testing::{engine, straight_route, StubDirections};
    use std::sync::Arc;
    use tokio_test::block_on;

    let engine = engine(
        Arc::new(MemoryStore::new()),
        StubDirections::Routes(vec![straight_route(5_000.0, 2)]),
    );

    let search = RouteSearch {
        source: Some("Connaught Place".into()),
        destination: Some("India Gate".into()),
        profile: Some("foot-walking".into()),
    };
    let route_id = block_on(engine.find_routes(search)).unwrap()[0].id;

    for rating in 1..=3 {
        block_on(engine.add_feedback(submission(&route_id.to_string(), rating))).unwrap();
    }

    let reviews = block_on(engine.find_feedback(route_id)).unwrap();
    let ratings: Vec<i32> = reviews.iter().map(|review| review.rating).collect();
    assert_eq!(ratings, vec![3, 2, 1]);
    assert!(block_on(engine.find_feedback(Uuid::new_v4())).unwrap().is_empty());
}
