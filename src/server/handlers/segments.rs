use axum::extract::Json;
use serde_json::{json, Value};

/// Reserved for segment overlays such as city lighting or crime data.
pub async fn index() -> Json<Value> {
    Json(json!({ "ok": true }))
}
