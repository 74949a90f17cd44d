use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// MOVIE CATALOG TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Closed set of genres a movie can be tagged with.
///
/// The JSON literals are case-sensitive and match [`Genre::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Crime,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Thriller,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Crime,
        Genre::Comedy,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Thriller,
        Genre::SciFi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Crime => "Crime",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
            Genre::SciFi => "Sci-Fi",
        }
    }

    /// Exact, case-sensitive lookup of a genre literal.
    pub fn from_literal(literal: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|genre| genre.as_str() == literal)
    }

    /// Case-insensitive comparison used by the list filter.
    pub fn matches_ignore_case(&self, query: &str) -> bool {
        self.as_str().to_lowercase() == query.to_lowercase()
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie record as stored in the catalog and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub genre: Vec<Genre>,
    pub year: u16,
    pub duration: u32,
    pub director: String,
    pub rate: f64,
    pub poster: String,
}

impl Movie {
    /// True if any of the movie's genres equals `query`, ignoring case.
    pub fn has_genre(&self, query: &str) -> bool {
        self.genre.iter().any(|genre| genre.matches_ignore_case(query))
    }

    /// Overwrite the fields present in `patch`, leaving the rest (and the id) untouched.
    pub fn apply(&mut self, patch: MoviePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(director) = patch.director {
            self.director = director;
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
        if let Some(poster) = patch.poster {
            self.poster = poster;
        }
    }
}

/// Validated payload for creating a movie. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMovie {
    pub title: String,
    pub genre: Vec<Genre>,
    pub year: u16,
    pub duration: u32,
    pub director: String,
    pub rate: f64,
    pub poster: String,
}

impl NewMovie {
    pub fn into_movie(self, id: String) -> Movie {
        Movie {
            id,
            title: self.title,
            genre: self.genre,
            year: self.year,
            duration: self.duration,
            director: self.director,
            rate: self.rate,
            poster: self.poster,
        }
    }
}

/// Validated payload for a partial update; `None` means "leave as is"
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoviePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<Genre>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Query parameters for `GET /movies`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieQuery {
    pub genre: Option<String>,
}

impl MovieQuery {
    /// The genre filter, treating an empty value as absent.
    pub fn genre_filter(&self) -> Option<&str> {
        self.genre.as_deref().filter(|genre| !genre.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_movie() -> Movie {
        Movie {
            id: "c8a7d63f-3b04-44d3-9d95-8782fd7dcfaf".to_string(),
            title: "The Dark Knight".to_string(),
            genre: vec![Genre::Action, Genre::Crime, Genre::Drama],
            year: 2008,
            duration: 152,
            director: "Christopher Nolan".to_string(),
            rate: 9.0,
            poster: "https://example.com/dark-knight.jpg".to_string(),
        }
    }

    #[test]
    fn test_sci_fi_uses_hyphenated_literal() {
        assert_eq!(serde_json::to_value(Genre::SciFi).unwrap(), json!("Sci-Fi"));
        let parsed: Genre = serde_json::from_value(json!("Sci-Fi")).unwrap();
        assert_eq!(parsed, Genre::SciFi);
    }

    #[test]
    fn test_from_literal_is_case_sensitive() {
        assert_eq!(Genre::from_literal("Horror"), Some(Genre::Horror));
        assert_eq!(Genre::from_literal("horror"), None);
        assert_eq!(Genre::from_literal("SciFi"), None);
    }

    #[test]
    fn test_has_genre_ignores_case() {
        let movie = sample_movie();
        assert!(movie.has_genre("crime"));
        assert!(movie.has_genre("DRAMA"));
        assert!(!movie.has_genre("horror"));
    }

    #[test]
    fn test_apply_only_overwrites_present_fields() {
        let mut movie = sample_movie();
        let original = movie.clone();

        movie.apply(MoviePatch {
            rate: Some(9.5),
            ..MoviePatch::default()
        });

        assert_eq!(movie.rate, 9.5);
        assert_eq!(movie.id, original.id);
        assert_eq!(movie.title, original.title);
        assert_eq!(movie.genre, original.genre);
        assert_eq!(movie.poster, original.poster);
    }

    #[test]
    fn test_movie_json_shape() {
        let value = serde_json::to_value(sample_movie()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ["id", "title", "genre", "year", "duration", "director", "rate", "poster"] {
            assert!(keys.contains(&key), "missing key {key}");
        }
        assert_eq!(value["genre"], json!(["Action", "Crime", "Drama"]));
    }

    #[test]
    fn test_empty_genre_query_is_no_filter() {
        let query = MovieQuery {
            genre: Some(String::new()),
        };
        assert_eq!(query.genre_filter(), None);
    }
}
