//! Repository for the `ratings` table.

use cinedex_core::types::{MovieId, ViewerId};
use sqlx::PgPool;

use crate::models::rating::RatingSummary;

/// Provides rating upserts and aggregate reads.
pub struct RatingRepo;

impl RatingRepo {
    /// Record a viewer's rating for a movie, replacing any earlier one.
    ///
    /// A single `ON CONFLICT` statement; the `(movieid, userid)` primary key
    /// serializes concurrent writers for the same pair.
    pub async fn upsert(
        pool: &PgPool,
        movie_id: MovieId,
        viewer_id: ViewerId,
        rating: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO ratings (movieid, userid, rating) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (movieid, userid) DO UPDATE SET rating = EXCLUDED.rating",
        )
        .bind(movie_id)
        .bind(viewer_id)
        .bind(rating)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Average rating of a movie, rounded to one decimal.
    ///
    /// Returns `None` when the movie has no ratings.
    pub async fn aggregate_rating(
        pool: &PgPool,
        movie_id: MovieId,
    ) -> Result<Option<f32>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<f32>>(
            "SELECT ROUND(AVG(rating), 1)::float4 FROM ratings WHERE movieid = $1",
        )
        .bind(movie_id)
        .fetch_one(pool)
        .await
    }

    /// Average rating of a movie plus one viewer's own rating.
    pub async fn aggregate_and_viewer_rating(
        pool: &PgPool,
        movie_id: MovieId,
        viewer_id: ViewerId,
    ) -> Result<RatingSummary, sqlx::Error> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT ROUND(AVG(r.rating), 1)::float4 AS rating, \
                    (SELECT rating FROM ratings \
                     WHERE movieid = $1 AND userid = $2) AS user_rating \
             FROM ratings r \
             WHERE r.movieid = $1",
        )
        .bind(movie_id)
        .bind(viewer_id)
        .fetch_one(pool)
        .await
    }
}
