//! Movie list query options and their guard.
//!
//! [`MovieListParams`] is raw caller input. [`MovieQuery`] is what the
//! repository accepts, and the only way to build one is through
//! [`MovieQuery::from_params`], so every listing goes through the sort
//! whitelist and the page/year bounds. Sorting is a closed [`SortField`]
//! enum; no caller-provided string ever reaches SQL.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::movie::FIELD_YEAR_OF_RELEASE;
use crate::types::ViewerId;
use crate::validation::{current_year, ValidationErrors};

pub const FIELD_SORT_BY: &str = "SortBy";
pub const FIELD_PAGE: &str = "Page";
pub const FIELD_PAGE_SIZE: &str = "PageSize";

/// Page used when the caller does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Columns a movie listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortField {
    Title,
    YearOfRelease,
}

impl SortField {
    /// Match `raw` against the whitelist, ignoring ASCII case.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("title") {
            Some(Self::Title)
        } else if raw.eq_ignore_ascii_case("yearofrelease") {
            Some(Self::YearOfRelease)
        } else {
            None
        }
    }
}

/// Requested direction. `Unspecified` means the caller named a field without
/// a direction prefix; the repository sorts those descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[default]
    Unspecified,
    Ascending,
    Descending,
}

/// A validated sort: whitelisted field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MovieSort {
    pub field: SortField,
    pub order: SortOrder,
}

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Query parameters for listing movies, as received from a caller.
///
/// `sort_by` takes `+field` for ascending, `-field` for descending, or a
/// bare `field`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieListParams {
    pub title: Option<String>,
    pub year_of_release: Option<i32>,
    pub sort_by: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl MovieListParams {
    /// Split `sort_by` into its field name and direction.
    ///
    /// Returns `None` when no sort was requested.
    pub fn sort_parts(&self) -> Option<(&str, SortOrder)> {
        let raw = self.sort_by.as_deref()?;
        let field = raw.trim_matches(|c: char| c == '+' || c == '-');
        let order = if raw.starts_with('+') {
            SortOrder::Ascending
        } else if raw.starts_with('-') {
            SortOrder::Descending
        } else {
            SortOrder::Unspecified
        };
        Some((field, order))
    }
}

// ---------------------------------------------------------------------------
// Validated query
// ---------------------------------------------------------------------------

/// A guarded movie listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    title: Option<String>,
    year_of_release: Option<i32>,
    sort: Option<MovieSort>,
    page: i64,
    page_size: i64,
    viewer_id: Option<ViewerId>,
}

impl MovieQuery {
    /// Validate `params` against the current calendar year.
    ///
    /// `viewer_id` only surfaces that viewer's own rating on each row; it
    /// never filters results.
    pub fn from_params(
        params: &MovieListParams,
        viewer_id: Option<ViewerId>,
    ) -> Result<Self, CoreError> {
        Self::from_params_for_year(params, viewer_id, current_year())
    }

    /// Validate `params`, collecting every failing rule:
    ///
    /// - `YearOfRelease` must not be after `current_year`
    /// - `SortBy` must name a whitelisted field
    /// - `Page` and `PageSize` must be at least 1
    pub fn from_params_for_year(
        params: &MovieListParams,
        viewer_id: Option<ViewerId>,
        current_year: i32,
    ) -> Result<Self, CoreError> {
        let mut errors = ValidationErrors::new();

        if let Some(year) = params.year_of_release {
            if year > current_year {
                errors.add(
                    FIELD_YEAR_OF_RELEASE,
                    format!("Year of release must be less than or equal to {current_year}."),
                );
            }
        }

        let sort = match params.sort_parts() {
            None => None,
            Some((raw, order)) => match SortField::parse(raw) {
                Some(field) => Some(MovieSort { field, order }),
                None => {
                    errors.add(FIELD_SORT_BY, "You can only sort by Title or YearOfRelease.");
                    None
                }
            },
        };

        let page = params.page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            errors.add(FIELD_PAGE, "Page must be greater than or equal to 1.");
        }

        let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size < 1 {
            errors.add(FIELD_PAGE_SIZE, "Page size must be greater than or equal to 1.");
        }

        errors.into_result()?;

        Ok(Self {
            title: params.title.clone(),
            year_of_release: params.year_of_release,
            sort,
            page,
            page_size,
            viewer_id,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn year_of_release(&self) -> Option<i32> {
        self.year_of_release
    }

    pub fn sort(&self) -> Option<MovieSort> {
        self.sort
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn viewer_id(&self) -> Option<ViewerId> {
        self.viewer_id
    }

    /// Rows to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2024;

    fn params(sort_by: Option<&str>) -> MovieListParams {
        MovieListParams {
            sort_by: sort_by.map(str::to_string),
            ..Default::default()
        }
    }

    fn failed_fields(result: Result<MovieQuery, CoreError>) -> Vec<String> {
        match result.unwrap_err() {
            CoreError::Validation(errors) => {
                errors.errors().iter().map(|e| e.field.clone()).collect()
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // --- Sort whitelist ---

    #[test]
    fn sort_field_parse_is_case_insensitive() {
        assert_eq!(SortField::parse("title"), Some(SortField::Title));
        assert_eq!(SortField::parse("Title"), Some(SortField::Title));
        assert_eq!(
            SortField::parse("YEAROFRELEASE"),
            Some(SortField::YearOfRelease)
        );
        assert_eq!(SortField::parse("genres"), None);
        assert_eq!(SortField::parse(""), None);
    }

    #[test]
    fn accepts_whitelisted_sort_fields() {
        let q = MovieQuery::from_params_for_year(&params(Some("title")), None, YEAR).unwrap();
        assert_eq!(q.sort().unwrap().field, SortField::Title);

        let q = MovieQuery::from_params_for_year(&params(Some("YEAROFRELEASE")), None, YEAR)
            .unwrap();
        assert_eq!(q.sort().unwrap().field, SortField::YearOfRelease);
    }

    #[test]
    fn rejects_unknown_sort_field() {
        let result = MovieQuery::from_params_for_year(&params(Some("genres")), None, YEAR);
        assert_eq!(failed_fields(result), vec![FIELD_SORT_BY]);
    }

    #[test]
    fn rejects_injection_attempt_in_sort_field() {
        let result = MovieQuery::from_params_for_year(
            &params(Some("title; DROP TABLE movies")),
            None,
            YEAR,
        );
        assert_eq!(failed_fields(result), vec![FIELD_SORT_BY]);
    }

    #[test]
    fn sort_prefix_sets_direction() {
        let asc = MovieQuery::from_params_for_year(&params(Some("+title")), None, YEAR).unwrap();
        assert_eq!(asc.sort().unwrap().order, SortOrder::Ascending);

        let desc =
            MovieQuery::from_params_for_year(&params(Some("-yearofrelease")), None, YEAR).unwrap();
        assert_eq!(
            desc.sort(),
            Some(MovieSort {
                field: SortField::YearOfRelease,
                order: SortOrder::Descending,
            })
        );

        let bare = MovieQuery::from_params_for_year(&params(Some("title")), None, YEAR).unwrap();
        assert_eq!(bare.sort().unwrap().order, SortOrder::Unspecified);
    }

    #[test]
    fn no_sort_requested() {
        let q = MovieQuery::from_params_for_year(&params(None), None, YEAR).unwrap();
        assert_eq!(q.sort(), None);
    }

    // --- Year bound ---

    #[test]
    fn accepts_current_year_filter() {
        let p = MovieListParams {
            year_of_release: Some(YEAR),
            ..Default::default()
        };
        let q = MovieQuery::from_params_for_year(&p, None, YEAR).unwrap();
        assert_eq!(q.year_of_release(), Some(YEAR));
    }

    #[test]
    fn rejects_future_year_filter() {
        let p = MovieListParams {
            year_of_release: Some(YEAR + 1),
            ..Default::default()
        };
        let result = MovieQuery::from_params_for_year(&p, None, YEAR);
        assert_eq!(failed_fields(result), vec![FIELD_YEAR_OF_RELEASE]);
    }

    // --- Pagination ---

    #[test]
    fn defaults_page_and_size() {
        let q = MovieQuery::from_params_for_year(&params(None), None, YEAR).unwrap();
        assert_eq!(q.page(), DEFAULT_PAGE);
        assert_eq!(q.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn offset_follows_page() {
        let p = MovieListParams {
            page: Some(2),
            page_size: Some(10),
            ..Default::default()
        };
        let q = MovieQuery::from_params_for_year(&p, None, YEAR).unwrap();
        assert_eq!(q.offset(), 10);
    }

    #[test]
    fn rejects_non_positive_page_and_size() {
        let p = MovieListParams {
            page: Some(0),
            page_size: Some(0),
            ..Default::default()
        };
        let result = MovieQuery::from_params_for_year(&p, None, YEAR);
        assert_eq!(failed_fields(result), vec![FIELD_PAGE, FIELD_PAGE_SIZE]);
    }

    #[test]
    fn collects_every_failure() {
        let p = MovieListParams {
            year_of_release: Some(YEAR + 5),
            sort_by: Some("rating".to_string()),
            page: Some(-1),
            ..Default::default()
        };
        let result = MovieQuery::from_params_for_year(&p, None, YEAR);
        assert_eq!(
            failed_fields(result),
            vec![FIELD_YEAR_OF_RELEASE, FIELD_SORT_BY, FIELD_PAGE]
        );
    }

    #[test]
    fn viewer_is_carried_through() {
        let viewer = uuid::Uuid::now_v7();
        let q = MovieQuery::from_params_for_year(&params(None), Some(viewer), YEAR).unwrap();
        assert_eq!(q.viewer_id(), Some(viewer));
    }
}
