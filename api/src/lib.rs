//! HTTP CRUD service over an in-memory movie catalog.

pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod metrics_handler;
pub mod observability;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;

use axum::{
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower::ServiceBuilder;

use crate::cors::CorsPolicy;
use crate::state::AppState;

/// Build the full application router.
///
/// Layers run outermost first: the origin guard, then CORS response headers,
/// then the request logger, then routing.
pub fn app(state: AppState, cors: CorsPolicy) -> Router {
    let cors_layer = cors.layer();

    Router::new()
        .merge(routes::movie_routes())
        .merge(routes::observability_routes())
        .fallback(handlers::route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(cors, cors::enforce_origin))
                .layer(cors_layer)
                .layer(middleware::from_fn(request_logger)),
        )
        .with_state(state)
}

async fn request_logger(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status().as_u16();

    metrics::observe_http(method.as_str(), &path, status, elapsed.as_secs_f64());
    tracing::info!("{method} {uri} {status} {}ms", elapsed.as_millis());

    response
}
