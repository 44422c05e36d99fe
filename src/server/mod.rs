mod handlers;

use axum::{
    body::Body,
    extract::Extension,
    routing::{get, post},
    Router,
};
use http_body::Limited;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::api::DynAPI;
use crate::config::ServerConfig;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{feedback, health, routes, segments, BODY_LIMIT};

pub fn router(api: DynAPI) -> Router {
    Router::<Limited<Body>>::new()
        .route("/health", get(health::check))
        .route("/routes/find", post(routes::find))
        .route("/feedback/add", post(feedback::add))
        .route("/feedback/:route_id", get(feedback::find))
        .route("/segments", get(segments::index))
        .layer(Extension(api))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(api: DynAPI, config: &ServerConfig) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", config.addr);

    axum::Server::try_bind(&config.addr)
        .map_err(|e| unexpected_error(format!("failed to bind {}: {}", config.addr, e)))?
        .serve(app.into_make_service())
        .await
        .map_err(|e| unexpected_error(format!("server error: {}", e)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tokio_test::block_on;
    use tower::ServiceExt;

    use super::{router, BODY_LIMIT};
    use crate::api::DynAPI;
    use crate::db::MemoryStore;
    use crate::testing::{engine, straight_route, StubDirections};

    fn app() -> DynAPI {
        let store = Arc::new(MemoryStore::new());
        Arc::new(engine(
            store,
            StubDirections::Routes(vec![straight_route(5_000.0, 4)]),
        ))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        let body = body.to_string();

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::from(body))
            .unwrap()
    }

    fn send_raw(api: &DynAPI, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        block_on(async {
            let response = router(api.clone()).oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
            (status, bytes.to_vec())
        })
    }

    fn send(api: &DynAPI, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send_raw(api, request);
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn health_and_segments_placeholders() {
        let api = app();

        assert_eq!(send(&api, get("/health")), (StatusCode::OK, json!({ "ok": true })));
        assert_eq!(send(&api, get("/segments")), (StatusCode::OK, json!({ "ok": true })));
    }

    #[test]
    fn find_routes_requires_places() {
        let api = app();

        let (status, body) = send(&api, post_json("/routes/find", json!({ "source": "Connaught Place" })));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "source and destination are required");
    }

    #[test]
    fn search_review_and_list() {
        let api = app();

        let (status, body) = send(
            &api,
            post_json(
                "/routes/find",
                json!({ "source": "Connaught Place", "destination": "India Gate" }),
            ),
        );
        assert_eq!(status, StatusCode::OK);

        let route = &body["routes"][0];
        assert_eq!(route["distance"], "5 km");
        assert_eq!(route["duration"], "8 mins");
        assert_eq!(route["safetyScore"], 2.0);
        assert_eq!(route["coordinates"][0]["lat"], 28.6);
        let route_id = route["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &api,
            post_json(
                "/feedback/add",
                json!({ "userId": "u-1", "routeId": route_id, "rating": 5, "comment": "busy and bright" }),
            ),
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["ok"], true);
        assert_eq!(body["feedback"]["routeId"], route_id.as_str());
        assert_eq!(body["feedback"]["rating"], 5);

        let (status, body) = send(&api, get(&format!("/feedback/{}", route_id)));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reviews"][0]["comment"], "busy and bright");
    }

    #[test]
    fn feedback_requires_fields() {
        let api = app();

        let (status, body) = send(&api, post_json("/feedback/add", json!({ "userId": "u-1" })));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "userId, routeId, rating are required");
    }

    #[test]
    fn empty_search_body_is_reported_by_the_engine() {
        let api = app();

        let (status, body) = send(&api, post_raw("/routes/find", ""));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "source and destination are required");

        let (status, body) = send(&api, post_raw("/feedback/add", ""));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "userId, routeId, rating are required");
    }

    #[test]
    fn search_accepts_bodies_without_headers() {
        let api = app();

        let (status, body) = send(
            &api,
            post_raw(
                "/routes/find",
                r#"{"source": "Connaught Place", "destination": "India Gate"}"#,
            ),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["routes"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn malformed_json_is_a_json_400() {
        let api = app();

        let (status, body) = send(&api, post_raw("/routes/find", "{not json"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 100);

        let (status, body) = send(
            &api,
            post_json("/routes/find", json!({ "source": 5, "destination": "India Gate" })),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 100);
    }

    #[test]
    fn rating_may_be_a_numeric_string() {
        let api = app();

        let (_, body) = send(
            &api,
            post_json(
                "/routes/find",
                json!({ "source": "Connaught Place", "destination": "India Gate" }),
            ),
        );
        let route_id = body["routes"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &api,
            post_json(
                "/feedback/add",
                json!({ "userId": "u-1", "routeId": route_id, "rating": "5" }),
            ),
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["feedback"]["rating"], 5);

        let (status, body) = send(
            &api,
            post_json(
                "/feedback/add",
                json!({ "userId": "u-1", "routeId": route_id, "rating": "five" }),
            ),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 100);
    }

    #[test]
    fn malformed_route_id_is_a_json_400() {
        let api = app();

        let (status, body) = send(&api, get("/feedback/not-a-uuid"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "routeId is not a valid route id");
    }

    #[test]
    fn oversized_bodies_are_rejected() {
        let api = app();
        let body = " ".repeat(BODY_LIMIT + 1);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/routes/find")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap();

        let (status, _) = send_raw(&api, request);
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
