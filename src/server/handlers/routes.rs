use axum::body::Bytes;
use axum::extract::{rejection::BytesRejection, Extension, Json};
use serde_json::{json, Value};

use super::parse_json;
use crate::api::{DynAPI, RouteSearch};
use crate::error::Error;

pub async fn find(
    Extension(api): Extension<DynAPI>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, Error> {
    let search: RouteSearch = parse_json(body)?;
    let routes = api.find_routes(search).await?;

    Ok(Json(json!({ "routes": routes })))
}
