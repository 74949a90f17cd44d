use axum::{
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::validation::FieldError;

pub const MOVIE_NOT_FOUND: &str = "Movie not found";

#[derive(Debug)]
pub enum ApiError {
    /// 400 with every violation found in the request
    Validation(Vec<FieldError>),
    /// 404 with a `{ "message": ... }` body
    NotFound(String),
}

impl ApiError {
    pub fn movie_not_found() -> Self {
        Self::NotFound(MOVIE_NOT_FOUND.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let correlation_id = Uuid::new_v4().to_string();
        let status = self.status();

        let body = match self {
            ApiError::Validation(errors) => {
                tracing::info!(
                    correlation_id = %correlation_id,
                    violations = errors.len(),
                    "rejecting invalid request body"
                );
                json!({ "error": errors })
            }
            ApiError::NotFound(message) => {
                tracing::debug!(correlation_id = %correlation_id, %message, "resource not found");
                json!({ "message": message })
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(&correlation_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static("x-correlation-id"), value);
        }
        response
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body_is_message_only() {
        let response = ApiError::movie_not_found().into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-correlation-id"));
        assert_eq!(body_json(response).await, json!({ "message": "Movie not found" }));
    }

    #[tokio::test]
    async fn test_validation_body_lists_errors() {
        let response = ApiError::Validation(vec![FieldError::required("title")]).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({ "error": [{ "code": "required", "path": ["title"], "message": "title is required" }] })
        );
    }
}
