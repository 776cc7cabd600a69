use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::ErrorResponse;

/// Handler for unmatched routes.
///
/// Use this as the router fallback. The body names the path that missed:
///
/// ```json
/// {"status": "error", "message": "Route /user not found"}
/// ```
pub async fn not_found(uri: Uri) -> Response {
    let body = Json(ErrorResponse {
        status: Some("error"),
        message: format!("Route {} not found", uri.path()),
        allowed_fields: None,
    });

    (StatusCode::NOT_FOUND, body).into_response()
}
