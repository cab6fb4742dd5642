use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use crate::AppState;

pub async fn ping() -> impl IntoResponse {
    "OK"
}

pub async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.store.data_root_exists() {
        (StatusCode::OK, "OK").into_response()
    } else {
        warn!(
            data_root = %state.store.data_root().display(),
            "Ready check failed: data root does not exist"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, "Data root does not exist").into_response()
    }
}
