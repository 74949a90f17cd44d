//! Cross-origin policy
//!
//! Requests whose `Origin` is on the allow-list, or that carry no `Origin`
//! at all, are let through. Anything else is refused with a plain 403 before
//! routing, so no handler ever sees it.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::metrics;

pub const ACCEPTED_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "https://localhost:3333",
];

pub const REJECTION_BODY: &str = "Not allowed by CORS";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: Arc<[String]>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new(ACCEPTED_ORIGINS)
    }
}

impl CorsPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// A missing origin is always allowed; a present one must match exactly.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.origins.iter().any(|allowed| allowed == origin),
        }
    }

    /// Response-header side of the policy (preflight and `access-control-*`).
    pub fn layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    }
}

pub async fn enforce_origin(
    State(policy): State<CorsPolicy>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let allowed = match req.headers().get(header::ORIGIN) {
        None => true,
        Some(value) => value
            .to_str()
            .map(|origin| policy.is_allowed(Some(origin)))
            .unwrap_or(false),
    };

    if !allowed {
        metrics::CORS_REJECTIONS.inc();
        tracing::warn!(
            origin = ?req.headers().get(header::ORIGIN),
            method = %req.method(),
            uri = %req.uri(),
            "origin not allowed"
        );
        return (StatusCode::FORBIDDEN, REJECTION_BODY).into_response();
    }

    next.run(req).await
}
