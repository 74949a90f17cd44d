//! Input Validation Module
//!
//! Request bodies arrive as untyped JSON and are turned into typed values
//! only after passing the movie schema.
//!
//! # Overview
//!
//! 1. **Extractors** - `ValidatedJson<T>`, `FieldError`, `ValidationBuilder`
//! 2. **Validators** - reusable checks for strings, integers, numbers, genres and URLs
//! 3. **Requests** - the schema itself, as `Validatable` impls for `NewMovie`
//!    (full mode) and `MoviePatch` (partial mode)
//!
//! # Validation Error Response
//!
//! When validation fails, a 400 Bad Request lists every violation found:
//!
//! ```json
//! {
//!   "error": [
//!     {"code": "required", "path": ["title"], "message": "title is required"},
//!     {"code": "out_of_range", "path": ["year"], "message": "Number must be greater than or equal to 1888"}
//!   ]
//! }
//! ```

pub mod extractors;
pub mod requests;
pub mod validators;

pub use extractors::{
    Checked, ErrorCode, FieldError, FieldPath, PathSegment, Validatable, ValidatedJson,
    ValidationBuilder, ValidationError,
};
pub use requests::DEFAULT_RATE;

use movies_shared::{MoviePatch, NewMovie};
use serde_json::Value;

/// Full-mode check used on create
pub fn validate_movie(value: &Value) -> Checked<NewMovie> {
    NewMovie::validate(value)
}

/// Partial-mode check used on update
pub fn validate_partial(value: &Value) -> Checked<MoviePatch> {
    MoviePatch::validate(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_modes_differ_on_missing_fields() {
        let body = json!({ "rate": 9.5 });

        let errors = validate_movie(&body).unwrap_err();
        assert!(errors.iter().all(|e| e.code == ErrorCode::Required));

        let patch = validate_partial(&body).unwrap();
        assert_eq!(patch.rate, Some(9.5));
        assert_eq!(patch.title, None);
    }
}
