use axum::body::Bytes;
use axum::extract::{
    rejection::{BytesRejection, PathRejection},
    Extension, Json, Path,
};
use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use super::parse_json;
use crate::api::{DynAPI, FeedbackSubmission};
use crate::error::{invalid_input_error, Error};

pub async fn add(
    Extension(api): Extension<DynAPI>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let submission: FeedbackSubmission = parse_json(body)?;
    let feedback = api.add_feedback(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "feedback": feedback })),
    ))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    route_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, Error> {
    let Path(route_id) =
        route_id.map_err(|_| invalid_input_error("routeId is not a valid route id"))?;
    let reviews = api.find_feedback(route_id).await?;

    Ok(Json(json!({ "reviews": reviews })))
}
