//! Movie operations: validate input, then hand off to [`MovieRepo`].

use cinedex_core::error::CoreError;
use cinedex_core::movie::{validate_movie_draft, MovieDraft};
use cinedex_core::query::{MovieListParams, MovieQuery};
use cinedex_core::types::{MovieId, ViewerId};
use cinedex_db::models::movie::{Movie, MoviePage};
use cinedex_db::repositories::MovieRepo;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ServiceResult, MOVIE_EXISTS};
use crate::rating_service::RatingService;

pub struct MovieService;

impl MovieService {
    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Validate a draft and store it as a new movie with a fresh id.
    ///
    /// A taken slug is reported as [`CoreError::Conflict`] whether it is
    /// caught by the lookup here or by the unique constraint on insert.
    pub async fn create(pool: &PgPool, draft: MovieDraft) -> ServiceResult<Movie> {
        validate_movie_draft(&draft)?;

        let movie = Movie::from_draft(Uuid::now_v7(), draft);
        if MovieRepo::slug_exists(pool, movie.slug()).await? {
            return Err(CoreError::Conflict(MOVIE_EXISTS.into()).into());
        }

        MovieRepo::create(pool, &movie).await?;
        tracing::info!(movie_id = %movie.id, slug = %movie.slug(), "Movie created");
        Ok(movie)
    }

    // -----------------------------------------------------------------------
    // Read
    // -----------------------------------------------------------------------

    pub async fn get_by_id(
        pool: &PgPool,
        id: MovieId,
        viewer_id: Option<ViewerId>,
    ) -> ServiceResult<Option<Movie>> {
        Ok(MovieRepo::find_by_id(pool, id, viewer_id).await?)
    }

    pub async fn get_by_slug(
        pool: &PgPool,
        slug: &str,
        viewer_id: Option<ViewerId>,
    ) -> ServiceResult<Option<Movie>> {
        Ok(MovieRepo::find_by_slug(pool, slug, viewer_id).await?)
    }

    /// Look a movie up by id when `id_or_slug` parses as a UUID, otherwise
    /// by slug.
    pub async fn find(
        pool: &PgPool,
        id_or_slug: &str,
        viewer_id: Option<ViewerId>,
    ) -> ServiceResult<Option<Movie>> {
        match Uuid::parse_str(id_or_slug) {
            Ok(id) => Self::get_by_id(pool, id, viewer_id).await,
            Err(_) => Self::get_by_slug(pool, id_or_slug, viewer_id).await,
        }
    }

    /// Guard the listing parameters, then fetch one page and the total
    /// number of matches.
    pub async fn list(
        pool: &PgPool,
        params: &MovieListParams,
        viewer_id: Option<ViewerId>,
    ) -> ServiceResult<MoviePage> {
        let query = MovieQuery::from_params(params, viewer_id)?;

        let items = MovieRepo::query(pool, &query).await?;
        let total = MovieRepo::total_count(pool, query.title(), query.year_of_release()).await?;
        tracing::debug!(count = items.len(), total, page = query.page(), "Listed movies");

        Ok(MoviePage {
            items,
            page: query.page(),
            page_size: query.page_size(),
            total,
        })
    }

    // -----------------------------------------------------------------------
    // Update / delete
    // -----------------------------------------------------------------------

    /// Replace a movie's title, year and genres.
    ///
    /// Returns `None` if the movie does not exist. The returned movie carries
    /// the recomputed slug and current rating aggregates for `viewer_id`.
    pub async fn update(
        pool: &PgPool,
        id: MovieId,
        draft: MovieDraft,
        viewer_id: Option<ViewerId>,
    ) -> ServiceResult<Option<Movie>> {
        validate_movie_draft(&draft)?;

        if !MovieRepo::exists(pool, id).await? {
            return Ok(None);
        }

        let mut movie = Movie::from_draft(id, draft);
        if !MovieRepo::update(pool, &movie).await? {
            return Ok(None);
        }

        let summary = RatingService::rating_for(pool, id, viewer_id).await?;
        movie.rating = summary.rating.unwrap_or(0.0);
        movie.user_rating = summary.user_rating;

        tracing::info!(movie_id = %id, slug = %movie.slug(), "Movie updated");
        Ok(Some(movie))
    }

    /// Delete a movie along with its genres and ratings.
    pub async fn delete(pool: &PgPool, id: MovieId) -> ServiceResult<bool> {
        let deleted = MovieRepo::delete(pool, id).await?;
        if deleted {
            tracing::info!(movie_id = %id, "Movie deleted");
        }
        Ok(deleted)
    }
}
