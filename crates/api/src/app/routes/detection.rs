use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::Extension, response::IntoResponse};

use lineguard_detection::ObjectRef;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn detect(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::DetectRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let object = match ObjectRef::new(body.input.bucket, body.input.key) {
        Ok(o) => o,
        Err(e) => return errors::inspection_error_to_response(e),
    };

    match services.invoker.detect(&object).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => errors::inspection_error_to_response(e),
    }
}
