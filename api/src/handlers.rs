use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use movies_shared::{Movie, MoviePatch, MovieQuery, NewMovie};
use serde_json::{json, Value};

use crate::{
    error::{ApiError, ApiResult},
    metrics,
    state::AppState,
    validation::{ErrorCode, FieldError, FieldPath, ValidatedJson},
};

pub const GREETING: &str = "Tranka palanka";
pub const MOVIE_DELETED: &str = "Movie deleted";

fn map_query_rejection(err: QueryRejection) -> ApiError {
    ApiError::Validation(vec![FieldError::new(
        FieldPath::key("genre"),
        ErrorCode::InvalidType,
        format!("Invalid query parameters: {}", err.body_text()),
    )])
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": GREETING }))
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let uptime = state.started_at.elapsed().as_secs();
    let movies = state.store.len().await;

    tracing::debug!(uptime_secs = uptime, movies, "health check passed");
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptime_secs": uptime,
            "movies": movies,
        })),
    )
}

/// List movies, optionally filtered by genre (case-insensitive)
pub async fn list_movies(
    State(state): State<AppState>,
    params: Result<Query<MovieQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Movie>>> {
    let Query(params) = params.map_err(map_query_rejection)?;

    let movies = state.store.list(params.genre_filter()).await;
    tracing::debug!(genre = ?params.genre_filter(), count = movies.len(), "listed movies");

    Ok(Json(movies))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Movie>> {
    state
        .store
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(ApiError::movie_not_found)
}

/// Create a movie from a fully validated payload
pub async fn create_movie(
    State(state): State<AppState>,
    ValidatedJson(new_movie): ValidatedJson<NewMovie>,
) -> impl IntoResponse {
    let movie = state.store.create(new_movie).await;

    metrics::MOVIES_CREATED.inc();
    metrics::CATALOG_SIZE.inc();
    tracing::info!(movie_id = %movie.id, title = %movie.title, "movie created");

    (StatusCode::CREATED, Json(movie))
}

/// Merge the validated fields into an existing movie.
///
/// The body is validated before the id is looked up, so an invalid body on a
/// missing movie is a 400, not a 404.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<MoviePatch>,
) -> ApiResult<Json<Movie>> {
    let movie = state
        .store
        .update(&id, patch)
        .await
        .ok_or_else(ApiError::movie_not_found)?;

    metrics::MOVIES_UPDATED.inc();
    tracing::info!(movie_id = %movie.id, "movie updated");

    Ok(Json(movie))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let movie = state
        .store
        .delete(&id)
        .await
        .ok_or_else(ApiError::movie_not_found)?;

    metrics::MOVIES_DELETED.inc();
    metrics::CATALOG_SIZE.dec();
    tracing::info!(movie_id = %movie.id, title = %movie.title, "movie deleted");

    Ok(Json(json!({ "message": MOVIE_DELETED })))
}

pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
