//! Field validators for input validation
//!
//! Each validator inspects one untyped JSON value, returns the normalized
//! typed value on success, and reports failures located at `path`.

use movies_shared::Genre;
use serde_json::{Map, Number, Value};
use url::Url;

use super::extractors::{Checked, ErrorCode, FieldError, FieldPath};

/// Human readable JSON type name, used in `invalid_type` messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid_type(path: &FieldPath, expected: &str, value: &Value) -> Vec<FieldError> {
    vec![FieldError::new(
        path.clone(),
        ErrorCode::InvalidType,
        format!("Expected {expected}, received {}", json_type_name(value)),
    )]
}

fn out_of_range(path: &FieldPath, message: String) -> Vec<FieldError> {
    vec![FieldError::new(path.clone(), ErrorCode::OutOfRange, message)]
}

/// The request body must be a JSON object
pub fn require_object(value: &Value) -> Checked<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| invalid_type(&FieldPath::root(), "object", value))
}

/// Any JSON string
pub fn validate_string(value: &Value, path: &FieldPath) -> Checked<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(invalid_type(path, "string", other)),
    }
}

/// A JSON string with at least one character
pub fn validate_non_empty_string(value: &Value, path: &FieldPath) -> Checked<String> {
    let s = validate_string(value, path)?;
    if s.is_empty() {
        return Err(vec![FieldError::new(
            path.clone(),
            ErrorCode::Required,
            "must not be empty",
        )]);
    }
    Ok(s)
}

/// Integral value of a JSON number. `2021.0` counts, `2021.5` does not.
fn as_integer(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            // saturating: anything beyond i64 is out of range for every field anyway
            .map(|f| f as i64)
    })
}

/// An integer within `min..=max`, converted to the field's storage type
pub fn validate_integer_in_range<T>(value: &Value, path: &FieldPath, min: i64, max: i64) -> Checked<T>
where
    T: TryFrom<i64>,
{
    let n = match value {
        Value::Number(number) => {
            as_integer(number).ok_or_else(|| invalid_type(path, "integer", value))?
        }
        other => return Err(invalid_type(path, "integer", other)),
    };

    if n < min {
        return Err(out_of_range(
            path,
            format!("Number must be greater than or equal to {min}"),
        ));
    }
    if n > max {
        return Err(out_of_range(
            path,
            format!("Number must be less than or equal to {max}"),
        ));
    }

    T::try_from(n).map_err(|_| out_of_range(path, format!("Number must fit between {min} and {max}")))
}

/// Any JSON number within `min..=max`
pub fn validate_number_in_range(value: &Value, path: &FieldPath, min: f64, max: f64) -> Checked<f64> {
    let Some(n) = value.as_f64() else {
        return Err(invalid_type(path, "number", value));
    };

    if n < min {
        return Err(out_of_range(
            path,
            format!("Number must be greater than or equal to {min}"),
        ));
    }
    if n > max {
        return Err(out_of_range(
            path,
            format!("Number must be less than or equal to {max}"),
        ));
    }
    Ok(n)
}

/// An array of genre literals. Every bad element is reported with its index.
pub fn validate_genres(value: &Value, path: &FieldPath) -> Checked<Vec<Genre>> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(invalid_type(path, "array", other)),
    };

    let mut genres = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let item_path = path.index(i);
        let Value::String(literal) = item else {
            errors.extend(invalid_type(&item_path, "string", item));
            continue;
        };
        match Genre::from_literal(literal) {
            Some(genre) => genres.push(genre),
            None => errors.push(FieldError::new(
                item_path,
                ErrorCode::InvalidEnum,
                format!(
                    "Invalid enum value. Expected {}, received '{}'",
                    expected_genres(),
                    literal
                ),
            )),
        }
    }

    if errors.is_empty() {
        Ok(genres)
    } else {
        Err(errors)
    }
}

fn expected_genres() -> String {
    Genre::ALL
        .iter()
        .map(|genre| format!("'{}'", genre.as_str()))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// An absolute URL: it must parse and carry a host
pub fn validate_url(value: &Value, path: &FieldPath) -> Checked<String> {
    let raw = validate_string(value, path)?;
    match Url::parse(&raw) {
        Ok(url) if url.has_host() => Ok(raw),
        _ => Err(vec![FieldError::new(
            path.clone(),
            ErrorCode::InvalidFormat,
            "must be a valid URL",
        )]),
    }
}
