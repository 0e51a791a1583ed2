use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn route_alert(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::AlertRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let record = body.input.payload.image_details;

    match services.router.route(&record).await {
        Ok(dispatch) => Json(dispatch).into_response(),
        Err(e) => errors::inspection_error_to_response(e),
    }
}
