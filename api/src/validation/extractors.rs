//! Custom Axum extractors for validated input
//!
//! This module provides `ValidatedJson<T>`, a replacement for `Json<T>` that
//! reads the body as untyped JSON and only hands the handler a typed value
//! once it has passed the schema checks of `T`.

use std::fmt;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{error::ApiError, metrics};

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    InvalidType,
    InvalidEnum,
    OutOfRange,
    InvalidFormat,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Required => "required",
            ErrorCode::InvalidType => "invalid_type",
            ErrorCode::InvalidEnum => "invalid_enum",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidFormat => "invalid_format",
        }
    }
}

/// One step into a JSON document: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of the offending value inside the request body.
///
/// Serializes as a JSON array, e.g. `["genre", 1]`. The empty path points at
/// the body itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn key(name: impl Into<String>) -> Self {
        Self(vec![PathSegment::Key(name.into())])
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<body>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A field-level validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub code: ErrorCode,
    pub path: FieldPath,
    pub message: String,
}

impl FieldError {
    pub fn new(path: FieldPath, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            path,
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(
            FieldPath::key(field),
            ErrorCode::Required,
            format!("{field} is required"),
        )
    }
}

/// Result of checking one field: the normalized value or every problem found.
pub type Checked<T> = Result<T, Vec<FieldError>>;

/// Validation error that converts to an HTTP response
#[derive(Debug)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        ApiError::Validation(self.errors).into_response()
    }
}

/// Types that can be built from an untyped JSON body
///
/// Implementors check every field and report every violation in one pass.
pub trait Validatable: Sized {
    fn validate(value: &Value) -> Checked<Self>;
}

/// Custom JSON extractor that validates input
///
/// Use this instead of `Json<T>` to:
/// 1. Parse the request body as untyped JSON
/// 2. Run `T::validate` over it
/// 3. Return a 400 listing every violation when anything is wrong
///
/// # Example
///
/// ```ignore
/// pub async fn create_movie(
///     State(state): State<AppState>,
///     ValidatedJson(new_movie): ValidatedJson<NewMovie>,
/// ) -> impl IntoResponse {
///     // new_movie is fully typed and within schema
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: Validatable + Send,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|err| ValidationError::single(body_error(err)))?;

        let data = T::validate(&value).map_err(|errors| {
            for error in &errors {
                metrics::VALIDATION_FAILURES
                    .with_label_values(&[error.code.as_str()])
                    .inc();
            }
            tracing::debug!(violations = errors.len(), "request body failed validation");
            ValidationError::new(errors)
        })?;

        Ok(ValidatedJson(data))
    }
}

fn body_error(err: JsonRejection) -> FieldError {
    let message = match err {
        JsonRejection::JsonSyntaxError(e) => format!("Malformed JSON body: {}", e.body_text()),
        JsonRejection::JsonDataError(e) => format!("Invalid JSON body: {}", e.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Content-Type must be application/json".to_string()
        }
        JsonRejection::BytesRejection(_) => "Failed to read request body".to_string(),
        _ => "Invalid JSON payload".to_string(),
    };
    FieldError::new(FieldPath::root(), ErrorCode::InvalidType, message)
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Builder for accumulating validation errors across the fields of an object
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Check a field that must be present. Records `required` when it is missing.
    pub fn required<T, F>(&mut self, object: &Map<String, Value>, field: &str, check: F) -> Option<T>
    where
        F: FnOnce(&Value, &FieldPath) -> Checked<T>,
    {
        match object.get(field) {
            Some(value) => self.record(check(value, &FieldPath::key(field))),
            None => {
                self.errors.push(FieldError::required(field));
                None
            }
        }
    }

    /// Check a field only if it is present. Absence is not an error.
    pub fn optional<T, F>(&mut self, object: &Map<String, Value>, field: &str, check: F) -> Option<T>
    where
        F: FnOnce(&Value, &FieldPath) -> Checked<T>,
    {
        object
            .get(field)
            .and_then(|value| self.record(check(value, &FieldPath::key(field))))
    }

    fn record<T>(&mut self, result: Checked<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.errors.extend(errors);
                None
            }
        }
    }

    /// Add an error directly
    pub fn add_error(&mut self, error: FieldError) -> &mut Self {
        self.errors.push(error);
        self
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get current error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Finish building: `value` is returned only when no error was recorded
    pub fn build<T>(self, value: Option<T>) -> Checked<T> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(self.errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number_check(value: &Value, path: &FieldPath) -> Checked<i64> {
        value.as_i64().ok_or_else(|| {
            vec![FieldError::new(
                path.clone(),
                ErrorCode::InvalidType,
                "Expected number",
            )]
        })
    }

    #[test]
    fn test_field_error_serializes_path_as_array() {
        let error = FieldError::new(
            FieldPath::key("genre").index(1),
            ErrorCode::InvalidEnum,
            "bad genre",
        );
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["path"], json!(["genre", 1]));
        assert_eq!(value["code"], json!("invalid_enum"));
        assert_eq!(value["message"], json!("bad genre"));
    }

    #[test]
    fn test_field_path_display() {
        assert_eq!(FieldPath::root().to_string(), "<body>");
        assert_eq!(FieldPath::key("genre").index(2).to_string(), "genre[2]");
    }

    #[test]
    fn test_validation_builder_collects_every_error() {
        let body = json!({ "year": "abc" });
        let object = body.as_object().unwrap();
        let mut builder = ValidationBuilder::new();

        let title = builder.required(object, "title", number_check);
        let year = builder.required(object, "year", number_check);

        assert!(title.is_none());
        assert!(year.is_none());
        assert_eq!(builder.error_count(), 2);

        let errors = builder.build(Some(())).unwrap_err();
        assert_eq!(errors[0].code, ErrorCode::Required);
        assert_eq!(errors[1].code, ErrorCode::InvalidType);
    }

    #[test]
    fn test_optional_skips_missing_fields() {
        let body = json!({ "rate": 7 });
        let object = body.as_object().unwrap();
        let mut builder = ValidationBuilder::new();

        assert_eq!(builder.optional(object, "year", number_check), None);
        assert_eq!(builder.optional(object, "rate", number_check), Some(7));
        assert!(!builder.has_errors());
        assert_eq!(builder.build(Some(1)).unwrap(), 1);
    }
}
