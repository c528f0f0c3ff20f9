use axum::{http::StatusCode, Json};

/// Liveness probe. Doesn't touch the database
pub async fn ping() -> (StatusCode, Json<()>) {
    (StatusCode::OK, Json(()))
}
