//! Movie draft validation.
//!
//! A [`MovieDraft`] is the caller-supplied part of a movie (title, year,
//! genres) used for both creation and update. The slug is never part of the
//! draft; it is derived from title and year when the entity is built.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::validation::{current_year, ValidationErrors};

pub const FIELD_TITLE: &str = "Title";
pub const FIELD_YEAR_OF_RELEASE: &str = "YearOfRelease";
pub const FIELD_GENRES: &str = "Genres";

/// Maximum length for a movie title.
pub const MAX_TITLE_LEN: u64 = 200;

/// Title, release year and genres as submitted by a caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MovieDraft {
    #[validate(length(max = MAX_TITLE_LEN, message = "Title must be at most 200 characters."))]
    pub title: String,
    pub year_of_release: i32,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Validate a draft against the current calendar year.
pub fn validate_movie_draft(draft: &MovieDraft) -> Result<(), CoreError> {
    validate_movie_draft_for_year(draft, current_year())
}

/// Validate a draft: non-blank title, year not in the future, and genre
/// names that are non-blank and free of commas (genre sets travel as
/// comma-joined text in list queries).
pub fn validate_movie_draft_for_year(
    draft: &MovieDraft,
    current_year: i32,
) -> Result<(), CoreError> {
    let mut errors = ValidationErrors::new();

    if draft.title.trim().is_empty() {
        errors.add(FIELD_TITLE, "Title must not be empty.");
    }
    if let Err(derived) = draft.validate() {
        errors.merge_derived(&derived, field_key);
    }

    if draft.year_of_release > current_year {
        errors.add(
            FIELD_YEAR_OF_RELEASE,
            format!("Year of release must be less than or equal to {current_year}."),
        );
    }

    if draft.genres.iter().any(|g| g.trim().is_empty()) {
        errors.add(FIELD_GENRES, "Genre names must not be empty.");
    }
    if draft.genres.iter().any(|g| g.contains(',')) {
        errors.add(FIELD_GENRES, "Genre names must not contain commas.");
    }

    errors.into_result()
}

fn field_key(field: &str) -> String {
    match field {
        "title" => FIELD_TITLE.to_string(),
        "year_of_release" => FIELD_YEAR_OF_RELEASE.to_string(),
        "genres" => FIELD_GENRES.to_string(),
        other => other.to_string(),
    }
}
