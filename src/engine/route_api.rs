use super::helpers::{draft_segments, present};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{RouteAPI, RouteOption, RouteSearch},
    entities::Route,
    error::{invalid_input_error, not_found_error, Error},
    external::{RouteGeometry, DEFAULT_PROFILE},
    fingerprint::route_fingerprint,
    scoring::calculate_safety_score,
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_routes(&self, search: RouteSearch) -> Result<Vec<RouteOption>, Error> {
        let (source, destination) = match (present(search.source), present(search.destination)) {
            (Some(source), Some(destination)) => (source, destination),
            _ => return Err(invalid_input_error("source and destination are required")),
        };
        let profile = present(search.profile).unwrap_or_else(|| DEFAULT_PROFILE.into());

        let (origin, target) = futures::try_join!(
            self.geocoder.geocode(&source),
            self.geocoder.geocode(&destination)
        )?;

        let (origin, target) = match (origin, target) {
            (Some(origin), Some(target)) => (origin, target),
            _ => return Err(not_found_error("Unable to geocode one or both locations")),
        };

        let geometries = self
            .directions
            .find_routes(
                &origin.coordinates,
                &target.coordinates,
                &profile,
                self.search.alternatives,
            )
            .await?;

        tracing::info!("received {} candidate routes", geometries.len());

        let average_rating = self
            .store
            .average_rating_between(&source, &destination)
            .await?
            .unwrap_or(0.0);

        let mut options = Vec::with_capacity(geometries.len());
        for geometry in geometries {
            let route = self
                .store_route(&source, &destination, &profile, average_rating, geometry)
                .await?;

            let reviews = self
                .store
                .recent_feedback(route.id, Some(self.search.review_limit))
                .await?;

            options.push(RouteOption::new(route, reviews));
        }

        options.sort_by(|a, b| b.safety_score.total_cmp(&a.safety_score));

        Ok(options)
    }
}

impl Engine {
    /// Scores a candidate route and upserts it by fingerprint. Segments are
    /// only stored the first time a fingerprint is seen.
    #[tracing::instrument(skip(self, geometry))]
    async fn store_route(
        &self,
        source: &str,
        destination: &str,
        profile: &str,
        average_rating: f64,
        geometry: RouteGeometry,
    ) -> Result<Route, Error> {
        let drafts = draft_segments(&geometry.coordinates, self.risk.as_ref());
        let safety_score =
            calculate_safety_score(average_rating, drafts.iter().map(|draft| &draft.risk));

        let fingerprint = route_fingerprint(
            profile,
            source,
            destination,
            geometry.distance_meters,
            geometry.duration_seconds,
            &geometry.coordinates,
        );

        let route = Route::new(
            fingerprint,
            source.into(),
            destination.into(),
            geometry.distance_meters,
            geometry.duration_seconds,
            geometry.coordinates,
            safety_score,
        );

        let route = self.store.upsert_route(route).await?;

        if route.has_segments() {
            return Ok(route);
        }

        self.store.attach_segments(route.id, drafts).await
    }
}

#[cfg(test)]
fn search(source: &str, destination: &str) -> RouteSearch {
    RouteSearch {
        source: Some(source.into()),
        destination: Some(destination.into()),
        profile: None,
    }
}

#[test]
fn missing_places_are_rejected() {
    use crate::db::MemoryStore;
    use crate::testing::{engine, StubDirections};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tokio_test::block_on;

    let engine = engine(Arc::new(MemoryStore::new()), StubDirections::Routes(vec![]));

    let err = block_on(engine.find_routes(RouteSearch::default())).unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);

    let err = block_on(engine.find_routes(search("", "India Gate"))).unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[test]
fn unknown_place_is_not_found() {
    use crate::db::MemoryStore;
    use crate::testing::{engine, StubDirections};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tokio_test::block_on;

    let engine = engine(Arc::new(MemoryStore::new()), StubDirections::Routes(vec![]));

    let err = block_on(engine.find_routes(search("Connaught Place", "Atlantis"))).unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.message, "Unable to geocode one or both locations");
}

#[test]
fn provider_status_is_forwarded() {
    use crate::db::MemoryStore;
    use crate::testing::{engine, StubDirections};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tokio_test::block_on;

    let engine = engine(Arc::new(MemoryStore::new()), StubDirections::Failing(502));

    let err = block_on(engine.find_routes(search("Connaught Place", "India Gate"))).unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_GATEWAY);
}

#[test]
fn repeated_search_reuses_routes_and_segments() {
    use crate::db::MemoryStore;
    use crate::testing::{engine, straight_route, StubDirections};
    use std::sync::Arc;
    use tokio_test::block_on;

    let store = Arc::new(MemoryStore::new());
    let engine = engine(
        store.clone(),
        StubDirections::Routes(vec![straight_route(5_000.0, 4), straight_route(7_000.0, 6)]),
    );

    let first = block_on(engine.find_routes(search("Connaught Place", "India Gate"))).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(block_on(store.route_count()), 2);
    assert_eq!(block_on(store.segment_count()), 3 + 5);

    let second = block_on(engine.find_routes(search("Connaught Place", "India Gate"))).unwrap();
    assert_eq!(block_on(store.route_count()), 2);
    assert_eq!(block_on(store.segment_count()), 3 + 5);

    let mut first_ids: Vec<_> = first.iter().map(|option| option.id).collect();
    let mut second_ids: Vec<_> = second.iter().map(|option| option.id).collect();
    first_ids.sort();
    second_ids.sort();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn results_are_sorted_safest_first() {
    use crate::db::MemoryStore;
    use crate::testing::{engine, straight_route, StubDirections};
    use std::sync::Arc;
    use tokio_test::block_on;

    // no geometry means no segments and a neutral risk
    let engine = engine(
        Arc::new(MemoryStore::new()),
        StubDirections::Routes(vec![straight_route(3_000.0, 0), straight_route(12_345.0, 3)]),
    );

    let options = block_on(engine.find_routes(search("Connaught Place", "India Gate"))).unwrap();

    assert_eq!(options[0].safety_score, 2.0);
    assert_eq!(options[0].distance, "12.3 km");
    assert_eq!(options[0].duration, "21 mins");
    assert_eq!(options[0].coordinates.len(), 3);
    assert_eq!(options[1].safety_score, 1.2);
    assert!(options[0].reviews.is_empty());
}
