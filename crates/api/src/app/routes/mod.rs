use axum::{Router, routing::post};

pub mod alerts;
pub mod change_capture;
pub mod detection;
pub mod records;
pub mod system;

/// Router for the stage endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/detect", post(detection::detect))
        .route("/records", post(records::write_record))
        .route("/alerts", post(alerts::route_alert))
        .route("/change-capture", post(change_capture::process_batch))
}
