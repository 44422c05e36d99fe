pub mod feedback;
pub mod health;
pub mod routes;
pub mod segments;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use serde::de::DeserializeOwned;

use crate::error::{invalid_input_error, Error};

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Parses a JSON request body. A missing or blank body parses as the default
/// value so that required fields are reported by the engine.
pub fn parse_json<T>(body: Result<Bytes, BytesRejection>) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    let body = body.map_err(|e| invalid_input_error(format!("invalid request body: {}", e)))?;

    if body.iter().all(|byte| byte.is_ascii_whitespace()) {
        return Ok(T::default());
    }

    serde_json::from_slice(&body)
        .map_err(|e| invalid_input_error(format!("invalid JSON body: {}", e)))
}

#[test]
fn blank_bodies_parse_as_default() {
    use crate::api::RouteSearch;

    let search: RouteSearch = parse_json(Ok(Bytes::from_static(b" \n"))).unwrap();
    assert!(search.source.is_none());

    let err = parse_json::<RouteSearch>(Ok(Bytes::from_static(b"{\"source\": 5}"))).unwrap_err();
    assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
}
