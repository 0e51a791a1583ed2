use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn write_record(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RecordRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    match services.writer.write(body.input.payload).await {
        Ok(record) => Json(dto::ImageDetails { image_details: record }).into_response(),
        Err(e) => errors::inspection_error_to_response(e),
    }
}
