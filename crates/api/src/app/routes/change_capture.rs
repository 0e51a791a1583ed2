use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::Extension, response::IntoResponse};

use lineguard_events::ChangeBatch;

use crate::app::dto::ChangeCaptureResponse;
use crate::app::errors;
use crate::app::services::AppServices;

/// 200 for any decodable batch: per-record failures are reported in the body, never as an error status.
pub async fn process_batch(
    Extension(services): Extension<Arc<AppServices>>,
    batch: Result<Json<ChangeBatch>, JsonRejection>,
) -> axum::response::Response {
    let Json(batch) = match batch {
        Ok(batch) => batch,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let report = services.transformer.process(&batch).await;
    Json(ChangeCaptureResponse::from(report)).into_response()
}
