use axum::{routing::get, Router};

use crate::{handlers, metrics_handler, state::AppState};

pub fn observability_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(metrics_handler::metrics_endpoint))
}

pub fn movie_routes() -> Router<AppState> {
    // `/movies` and `/movies/` are the same collection resource
    Router::new()
        .route("/", get(handlers::root))
        .route("/movies", get(handlers::list_movies).post(handlers::create_movie))
        .route("/movies/", get(handlers::list_movies).post(handlers::create_movie))
        .route(
            "/movies/:id",
            get(handlers::get_movie)
                .patch(handlers::update_movie)
                .delete(handlers::delete_movie),
        )
}
