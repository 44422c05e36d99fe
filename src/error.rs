use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::{self, Debug, Display};

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub status: StatusCode,
    pub message: String,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status, self.message)
    }
}

impl std::error::Error for Error {}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.code,
            "error": self.message,
        }));

        (self.status, body).into_response()
    }
}

pub fn invalid_input_error(message: impl Into<String>) -> Error {
    Error {
        code: 100,
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

pub fn not_found_error(message: impl Into<String>) -> Error {
    Error {
        code: 101,
        status: StatusCode::NOT_FOUND,
        message: message.into(),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    Error {
        code: 2,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("database error: {:?}", err),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    let status = err
        .status()
        .map(|status| status.as_u16())
        .unwrap_or(500);

    upstream_error(status, err.to_string())
}

/// Failure reported by a third-party provider. The provider's status code is
/// forwarded to the caller when it is a valid HTTP status, otherwise 500.
pub fn upstream_error(status: u16, message: impl Into<String>) -> Error {
    Error {
        code: 4,
        status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        message: message.into(),
    }
}

pub fn unexpected_error(message: impl Into<String>) -> Error {
    Error {
        code: 5,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

pub fn config_error(message: impl Into<String>) -> Error {
    Error {
        code: 6,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.into(),
    }
}

impl Error {
    pub fn is_auth_failure(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED || self.status == StatusCode::FORBIDDEN
    }
}

#[test]
fn upstream_status_is_forwarded() {
    let err = upstream_error(403, "Directions failed: forbidden");
    assert_eq!(err.status, StatusCode::FORBIDDEN);
    assert!(err.is_auth_failure());

    let err = upstream_error(1000, "bogus");
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!err.is_auth_failure());
}

#[test]
fn error_response_carries_status_and_message() {
    use tokio_test::block_on;

    let response = not_found_error("Unable to geocode one or both locations").into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = block_on(hyper::body::to_bytes(response.into_body())).unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Unable to geocode one or both locations");
    assert_eq!(body["code"], 101);
}
