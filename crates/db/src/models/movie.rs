//! Movie entity, list page, and row mappings.

use std::collections::BTreeSet;

use cinedex_core::movie::MovieDraft;
use cinedex_core::slug::slugify;
use cinedex_core::types::MovieId;
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A movie with its genre set and rating aggregates.
///
/// Title, year and slug are private: the slug is derived from title and year
/// when the entity is built and recomputed only through [`Movie::rename`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub id: MovieId,
    title: String,
    year_of_release: i32,
    slug: String,
    pub genres: BTreeSet<String>,
    /// Mean of all viewer ratings, one decimal; `0.0` when unrated.
    pub rating: f32,
    /// The requesting viewer's own rating, when a viewer was supplied.
    pub user_rating: Option<i32>,
}

impl Movie {
    /// Build a new, unrated movie. `id` is assigned by the caller.
    pub fn new(
        id: MovieId,
        title: impl Into<String>,
        year_of_release: i32,
        genres: impl IntoIterator<Item = String>,
    ) -> Self {
        let title = title.into();
        let slug = slugify(&title, year_of_release);
        Self {
            id,
            title,
            year_of_release,
            slug,
            genres: genres.into_iter().collect(),
            rating: 0.0,
            user_rating: None,
        }
    }

    /// Build a new, unrated movie from a caller-supplied draft.
    pub fn from_draft(id: MovieId, draft: MovieDraft) -> Self {
        Self::new(id, draft.title, draft.year_of_release, draft.genres)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year_of_release(&self) -> i32 {
        self.year_of_release
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Change title and year. The slug is re-derived only if either changed.
    pub fn rename(&mut self, title: impl Into<String>, year_of_release: i32) {
        let title = title.into();
        if title != self.title || year_of_release != self.year_of_release {
            self.slug = slugify(&title, year_of_release);
            self.title = title;
            self.year_of_release = year_of_release;
        }
    }
}

/// One page of a movie listing plus the total match count.
#[derive(Debug, Clone, Serialize)]
pub struct MoviePage {
    pub items: Vec<Movie>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

// ---------------------------------------------------------------------------
// Row mappings
// ---------------------------------------------------------------------------

/// Single-movie lookup row (genres are fetched separately).
#[derive(Debug, FromRow)]
pub(crate) struct MovieRow {
    pub id: MovieId,
    pub slug: String,
    pub title: String,
    pub yearofrelease: i32,
    pub rating: f32,
    pub userrating: Option<i32>,
}

impl MovieRow {
    pub(crate) fn into_movie(self, genres: Vec<String>) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            year_of_release: self.yearofrelease,
            slug: self.slug,
            genres: genres.into_iter().collect(),
            rating: self.rating,
            user_rating: self.userrating,
        }
    }
}

/// Listing row: genres arrive comma-joined from `string_agg`.
#[derive(Debug, FromRow)]
pub(crate) struct MovieListRow {
    pub id: MovieId,
    pub slug: String,
    pub title: String,
    pub yearofrelease: i32,
    pub genres: Option<String>,
    pub rating: f32,
    pub userrating: Option<i32>,
}

impl MovieListRow {
    pub(crate) fn into_movie(self) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            year_of_release: self.yearofrelease,
            slug: self.slug,
            genres: split_genres(self.genres.as_deref()),
            rating: self.rating,
            user_rating: self.userrating,
        }
    }
}

fn split_genres(joined: Option<&str>) -> BTreeSet<String> {
    joined
        .map(|s| {
            s.split(',')
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
