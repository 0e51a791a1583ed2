use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use lineguard_core::InspectionError;

pub fn inspection_error_to_response(err: InspectionError) -> axum::response::Response {
    match err {
        InspectionError::Input(msg) => json_error(StatusCode::BAD_REQUEST, "input_error", msg),
        InspectionError::Dependency { service, message } => (
            StatusCode::BAD_GATEWAY,
            axum::Json(json!({
                "error": "dependency_error",
                "service": service,
                "message": message,
            })),
        )
            .into_response(),
    }
}

/// Undecodable bodies (bad syntax, blank ids, out-of-range confidence) are input errors.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            json_error(StatusCode::BAD_REQUEST, "input_error", rejection.body_text())
        }
        other => json_error(other.status(), "invalid_body", other.body_text()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
