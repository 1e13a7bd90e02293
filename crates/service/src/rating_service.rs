use cinedex_core::rating::validate_rating;
use cinedex_core::types::{MovieId, ViewerId};
use cinedex_db::models::rating::RatingSummary;
use cinedex_db::repositories::{MovieRepo, RatingRepo};
use sqlx::PgPool;

use crate::error::ServiceResult;

pub struct RatingService;

impl RatingService {
    /// Record `rating` for a movie on behalf of a viewer.
    ///
    /// Returns `false` when the movie does not exist.
    pub async fn rate_movie(
        pool: &PgPool,
        movie_id: MovieId,
        viewer_id: ViewerId,
        rating: i32,
    ) -> ServiceResult<bool> {
        validate_rating(rating)?;

        if !MovieRepo::exists(pool, movie_id).await? {
            return Ok(false);
        }

        let stored = RatingRepo::upsert(pool, movie_id, viewer_id, rating).await?;
        tracing::info!(movie_id = %movie_id, viewer_id = %viewer_id, rating, "Movie rated");
        Ok(stored)
    }

    /// Average rating of a movie and, when a viewer is given, their own.
    pub async fn rating_for(
        pool: &PgPool,
        movie_id: MovieId,
        viewer_id: Option<ViewerId>,
    ) -> ServiceResult<RatingSummary> {
        let summary = match viewer_id {
            Some(viewer_id) => {
                RatingRepo::aggregate_and_viewer_rating(pool, movie_id, viewer_id).await?
            }
            None => RatingSummary {
                rating: RatingRepo::aggregate_rating(pool, movie_id).await?,
                user_rating: None,
            },
        };
        Ok(summary)
    }
}
