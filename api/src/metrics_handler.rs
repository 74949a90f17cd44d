use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::metrics;
use crate::state::AppState;

pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let body = metrics::gather_metrics(&state.registry);
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}
