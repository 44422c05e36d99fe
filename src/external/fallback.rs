use async_trait::async_trait;

use super::{Directions, RouteGeometry};
use crate::{entities::Coordinates, error::Error};

/// Uses the primary provider when one is configured, and the fallback when it
/// is not or when the primary rejects our credentials. The fallback is only
/// used for the request that failed.
pub struct FallbackDirections<P, F> {
    primary: Option<P>,
    fallback: F,
}

impl<P, F> FallbackDirections<P, F> {
    pub fn new(primary: Option<P>, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P, F> Directions for FallbackDirections<P, F>
where
    P: Directions,
    F: Directions,
{
    #[tracing::instrument(skip(self))]
    async fn find_routes(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        profile: &str,
        alternatives: u32,
    ) -> Result<Vec<RouteGeometry>, Error> {
        let primary = match &self.primary {
            Some(primary) => primary,
            None => {
                return self
                    .fallback
                    .find_routes(origin, destination, profile, alternatives)
                    .await
            }
        };

        match primary
            .find_routes(origin, destination, profile, alternatives)
            .await
        {
            Err(err) if err.is_auth_failure() => {
                tracing::warn!("primary directions provider rejected credentials: {}", err);
                self.fallback
                    .find_routes(origin, destination, profile, alternatives)
                    .await
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod stubs {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::upstream_error;

    pub struct Scripted {
        pub status: Option<u16>,
        pub distance: f64,
        pub calls: AtomicUsize,
    }

    impl Scripted {
        pub fn ok(distance: f64) -> Self {
            Self {
                status: None,
                distance,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                status: Some(status),
                distance: 0.0,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Directions for Scripted {
        async fn find_routes(
            &self,
            _origin: &Coordinates,
            _destination: &Coordinates,
            _profile: &str,
            _alternatives: u32,
        ) -> Result<Vec<RouteGeometry>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            match self.status {
                Some(status) => Err(upstream_error(status, "Directions failed: scripted")),
                None => Ok(vec![RouteGeometry {
                    distance_meters: self.distance,
                    duration_seconds: 60.0,
                    coordinates: vec![],
                }]),
            }
        }
    }
}

#[test]
fn falls_back_on_auth_failure() {
    use std::sync::atomic::Ordering;
    use stubs::Scripted;
    use tokio_test::block_on;

    let point = Coordinates::new(0.0, 0.0);

    for status in [401, 403] {
        let directions = FallbackDirections::new(Some(Scripted::failing(status)), Scripted::ok(2.0));
        let routes = block_on(directions.find_routes(&point, &point, "driving-car", 5)).unwrap();

        assert_eq!(routes[0].distance_meters, 2.0);
        assert_eq!(directions.fallback.calls.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn other_failures_are_forwarded() {
    use axum::http::StatusCode;
    use std::sync::atomic::Ordering;
    use stubs::Scripted;
    use tokio_test::block_on;

    let point = Coordinates::new(0.0, 0.0);
    let directions = FallbackDirections::new(Some(Scripted::failing(429)), Scripted::ok(2.0));

    let err = block_on(directions.find_routes(&point, &point, "driving-car", 5)).unwrap_err();
    assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(directions.fallback.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_primary_uses_fallback() {
    use stubs::Scripted;
    use tokio_test::block_on;

    let point = Coordinates::new(0.0, 0.0);
    let directions: FallbackDirections<Scripted, Scripted> =
        FallbackDirections::new(None, Scripted::ok(7.0));

    let routes = block_on(directions.find_routes(&point, &point, "driving-car", 5)).unwrap();
    assert_eq!(routes[0].distance_meters, 7.0);
}
