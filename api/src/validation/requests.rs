//! Validation implementations for API request types
//!
//! The movie schema in both of its modes: full (create) and partial (update).

use movies_shared::{Genre, MoviePatch, NewMovie};
use serde_json::Value;

use super::extractors::{Checked, FieldPath, Validatable, ValidationBuilder};
use super::validators::{
    require_object, validate_genres, validate_integer_in_range, validate_non_empty_string,
    validate_number_in_range, validate_string, validate_url,
};

// ─────────────────────────────────────────────────────────────────────────────
// Constants for validation rules
// ─────────────────────────────────────────────────────────────────────────────

/// Year of the first surviving motion picture
pub const MIN_YEAR: i64 = 1888;
pub const MAX_YEAR: i64 = 2077;
/// Duration in minutes must be strictly positive
pub const MIN_DURATION: i64 = 1;
pub const MAX_DURATION: i64 = u32::MAX as i64;
pub const MIN_RATE: f64 = 0.0;
pub const MAX_RATE: f64 = 10.0;
/// Rate assigned on create when the client omits it
pub const DEFAULT_RATE: f64 = 5.0;

// ─────────────────────────────────────────────────────────────────────────────
// Field rules shared by both modes
// ─────────────────────────────────────────────────────────────────────────────

fn check_title(value: &Value, path: &FieldPath) -> Checked<String> {
    validate_non_empty_string(value, path)
}

fn check_genre(value: &Value, path: &FieldPath) -> Checked<Vec<Genre>> {
    validate_genres(value, path)
}

fn check_year(value: &Value, path: &FieldPath) -> Checked<u16> {
    validate_integer_in_range(value, path, MIN_YEAR, MAX_YEAR)
}

fn check_duration(value: &Value, path: &FieldPath) -> Checked<u32> {
    validate_integer_in_range(value, path, MIN_DURATION, MAX_DURATION)
}

fn check_director(value: &Value, path: &FieldPath) -> Checked<String> {
    validate_string(value, path)
}

fn check_rate(value: &Value, path: &FieldPath) -> Checked<f64> {
    validate_number_in_range(value, path, MIN_RATE, MAX_RATE)
}

fn check_poster(value: &Value, path: &FieldPath) -> Checked<String> {
    validate_url(value, path)
}

// ─────────────────────────────────────────────────────────────────────────────
// NewMovie validation (full mode)
// ─────────────────────────────────────────────────────────────────────────────

impl Validatable for NewMovie {
    fn validate(value: &Value) -> Checked<Self> {
        let object = require_object(value)?;
        let mut builder = ValidationBuilder::new();

        let title = builder.required(object, "title", check_title);
        let genre = builder.required(object, "genre", check_genre);
        let year = builder.required(object, "year", check_year);
        let duration = builder.required(object, "duration", check_duration);
        let director = builder.required(object, "director", check_director);
        let rate = if object.contains_key("rate") {
            builder.optional(object, "rate", check_rate)
        } else {
            Some(DEFAULT_RATE)
        };
        let poster = builder.required(object, "poster", check_poster);

        let movie = match (title, genre, year, duration, director, rate, poster) {
            (
                Some(title),
                Some(genre),
                Some(year),
                Some(duration),
                Some(director),
                Some(rate),
                Some(poster),
            ) => Some(NewMovie {
                title,
                genre,
                year,
                duration,
                director,
                rate,
                poster,
            }),
            _ => None,
        };

        builder.build(movie)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MoviePatch validation (partial mode)
// ─────────────────────────────────────────────────────────────────────────────

impl Validatable for MoviePatch {
    fn validate(value: &Value) -> Checked<Self> {
        let object = require_object(value)?;
        let mut builder = ValidationBuilder::new();

        // `id` and any other unknown key are dropped here, never merged.
        let patch = MoviePatch {
            title: builder.optional(object, "title", check_title),
            genre: builder.optional(object, "genre", check_genre),
            year: builder.optional(object, "year", check_year),
            duration: builder.optional(object, "duration", check_duration),
            director: builder.optional(object, "director", check_director),
            rate: builder.optional(object, "rate", check_rate),
            poster: builder.optional(object, "poster", check_poster),
        };

        builder.build(Some(patch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ErrorCode, FieldError};
    use serde_json::json;

    fn dune() -> Value {
        json!({
            "title": "Dune",
            "genre": ["Sci-Fi"],
            "year": 2021,
            "duration": 155,
            "director": "Denis Villeneuve",
            "poster": "https://example.com/p.jpg"
        })
    }

    fn find<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a FieldError> {
        errors
            .iter()
            .find(|e| e.path.segments().first() == Some(&crate::validation::PathSegment::Key(field.into())))
    }

    #[test]
    fn test_full_mode_defaults_rate() {
        let movie = NewMovie::validate(&dune()).unwrap();
        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.genre, vec![Genre::SciFi]);
        assert_eq!(movie.year, 2021);
        assert_eq!(movie.duration, 155);
        assert_eq!(movie.rate, DEFAULT_RATE);
        assert_eq!(movie.poster, "https://example.com/p.jpg");
    }

    #[test]
    fn test_full_mode_keeps_supplied_rate() {
        let mut body = dune();
        body["rate"] = json!(8.3);
        assert_eq!(NewMovie::validate(&body).unwrap().rate, 8.3);
    }

    #[test]
    fn test_full_mode_reports_missing_title_and_bad_year_together() {
        let mut body = dune();
        body.as_object_mut().unwrap().remove("title");
        body["year"] = json!(1700);

        let errors = NewMovie::validate(&body).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(find(&errors, "title").unwrap().code, ErrorCode::Required);
        assert_eq!(find(&errors, "year").unwrap().code, ErrorCode::OutOfRange);
    }

    #[test]
    fn test_full_mode_reports_every_missing_field() {
        let errors = NewMovie::validate(&json!({})).unwrap_err();
        let fields: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();

        assert_eq!(
            fields,
            vec!["title", "genre", "year", "duration", "director", "poster"]
        );
        assert!(errors.iter().all(|e| e.code == ErrorCode::Required));
    }

    #[test]
    fn test_full_mode_rejects_null_and_wrong_types() {
        let mut body = dune();
        body["title"] = json!(null);
        body["year"] = json!("2021");
        body["rate"] = json!("high");
        body["poster"] = json!("not a url");

        let errors = NewMovie::validate(&body).unwrap_err();

        assert_eq!(find(&errors, "title").unwrap().code, ErrorCode::InvalidType);
        assert_eq!(find(&errors, "year").unwrap().code, ErrorCode::InvalidType);
        assert_eq!(find(&errors, "rate").unwrap().code, ErrorCode::InvalidType);
        assert_eq!(find(&errors, "poster").unwrap().code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_full_mode_rejects_non_positive_duration() {
        let mut body = dune();
        body["duration"] = json!(0);
        let errors = NewMovie::validate(&body).unwrap_err();
        assert_eq!(find(&errors, "duration").unwrap().code, ErrorCode::OutOfRange);
    }

    #[test]
    fn test_full_mode_accepts_empty_genre_list() {
        let mut body = dune();
        body["genre"] = json!([]);
        assert!(NewMovie::validate(&body).unwrap().genre.is_empty());
    }

    #[test]
    fn test_non_object_body_is_single_root_error() {
        for body in [json!([]), json!("movie"), json!(null), json!(12)] {
            let errors = NewMovie::validate(&body).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].path.is_root());
            assert_eq!(errors[0].code, ErrorCode::InvalidType);

            assert!(MoviePatch::validate(&body).is_err());
        }
    }

    #[test]
    fn test_partial_mode_accepts_subset() {
        let patch = MoviePatch::validate(&json!({ "rate": 9.5 })).unwrap();
        assert_eq!(
            patch,
            MoviePatch {
                rate: Some(9.5),
                ..MoviePatch::default()
            }
        );
    }

    #[test]
    fn test_partial_mode_accepts_empty_object_without_defaults() {
        let patch = MoviePatch::validate(&json!({})).unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.rate, None);
    }

    #[test]
    fn test_partial_mode_drops_client_id_and_unknown_fields() {
        let patch = MoviePatch::validate(&json!({
            "id": "hijack",
            "budget": 100,
            "title": "Renamed"
        }))
        .unwrap();

        assert_eq!(patch.title.as_deref(), Some("Renamed"));
        let serialized = serde_json::to_value(&patch).unwrap();
        assert_eq!(serialized, json!({ "title": "Renamed" }));
    }

    #[test]
    fn test_partial_mode_validates_present_fields() {
        let errors = MoviePatch::validate(&json!({
            "rate": 11,
            "genre": ["Action", "Western"],
            "director": null
        }))
        .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(find(&errors, "genre").unwrap().path, FieldPath::key("genre").index(1));
        assert_eq!(find(&errors, "rate").unwrap().code, ErrorCode::OutOfRange);
        assert_eq!(find(&errors, "director").unwrap().code, ErrorCode::InvalidType);
    }
}
