//! Repository for the `movies` and `genres` tables.
//!
//! Every read joins `ratings` to attach the movie-wide average and, when a
//! viewer is supplied, that viewer's own rating. Writes touching more than
//! one table run in a single transaction.

use cinedex_core::query::{MovieQuery, SortField, SortOrder};
use cinedex_core::types::{MovieId, ViewerId};
use sqlx::PgPool;

use crate::error::{is_unique_violation, DbError, SLUG_CONSTRAINT};
use crate::models::movie::{Movie, MovieListRow, MovieRow};

/// Columns and rating aggregates shared by the single-row lookups.
///
/// `$1` is the lookup key, `$2` the optional viewer id.
const MOVIE_WITH_RATINGS: &str = "\
    SELECT m.id, m.slug, m.title, m.yearofrelease, \
           COALESCE(ROUND(AVG(r.rating), 1), 0)::float4 AS rating, \
           myr.rating AS userrating \
    FROM movies m \
    LEFT JOIN ratings r ON r.movieid = m.id \
    LEFT JOIN ratings myr ON myr.movieid = m.id AND myr.userid = $2";

/// Filter predicate shared by `query` and `total_count` so both always
/// agree on which movies match. `$1` is a LIKE pattern, `$2` a year.
const FILTER_CLAUSE: &str = "\
    ($1::text IS NULL OR m.title LIKE $1 ESCAPE '\\') \
    AND ($2::int4 IS NULL OR m.yearofrelease = $2)";

/// Provides CRUD and aggregate queries for movies and their genres.
pub struct MovieRepo;

impl MovieRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a movie and its genres atomically.
    ///
    /// Returns [`DbError::SlugConflict`] if another movie already owns the
    /// derived slug; nothing is written in that case.
    pub async fn create(pool: &PgPool, movie: &Movie) -> Result<(), DbError> {
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO movies (id, slug, title, yearofrelease) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(movie.id)
        .bind(movie.slug())
        .bind(movie.title())
        .bind(movie.year_of_release())
        .execute(&mut *tx)
        .await;

        // Dropping `tx` on the error path rolls it back.
        if let Err(err) = inserted {
            return Err(slug_conflict_or(err, movie));
        }

        Self::insert_genres_inner(&mut tx, movie).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Replace title, year, slug and the whole genre set of a movie.
    ///
    /// Ratings are not touched. Returns `false` without writing anything if
    /// no movie with this id exists.
    pub async fn update(pool: &PgPool, movie: &Movie) -> Result<bool, DbError> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE movies SET slug = $2, title = $3, yearofrelease = $4 \
             WHERE id = $1",
        )
        .bind(movie.id)
        .bind(movie.slug())
        .bind(movie.title())
        .bind(movie.year_of_release())
        .execute(&mut *tx)
        .await;

        // Dropping `tx` on either early return rolls it back.
        let result = match updated {
            Ok(result) => result,
            Err(err) => return Err(slug_conflict_or(err, movie)),
        };
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM genres WHERE movieid = $1")
            .bind(movie.id)
            .execute(&mut *tx)
            .await?;

        Self::insert_genres_inner(&mut tx, movie).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a movie with its genres and ratings.
    ///
    /// Returns `true` if a movie row was removed.
    pub async fn delete(pool: &PgPool, id: MovieId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM ratings WHERE movieid = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM genres WHERE movieid = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a movie by id, with its genres and rating aggregates.
    pub async fn find_by_id(
        pool: &PgPool,
        id: MovieId,
        viewer_id: Option<ViewerId>,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("{MOVIE_WITH_RATINGS} WHERE m.id = $1 GROUP BY m.id, myr.rating");
        let row = sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .bind(viewer_id)
            .fetch_optional(pool)
            .await?;

        Self::with_genres(pool, row).await
    }

    /// Find a movie by slug, with its genres and rating aggregates.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
        viewer_id: Option<ViewerId>,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("{MOVIE_WITH_RATINGS} WHERE m.slug = $1 GROUP BY m.id, myr.rating");
        let row = sqlx::query_as::<_, MovieRow>(&query)
            .bind(slug)
            .bind(viewer_id)
            .fetch_optional(pool)
            .await?;

        Self::with_genres(pool, row).await
    }

    /// List one page of movies matching the query's filters.
    ///
    /// Without a sort field the row order is whatever PostgreSQL returns.
    pub async fn query(pool: &PgPool, options: &MovieQuery) -> Result<Vec<Movie>, sqlx::Error> {
        let order_clause = order_clause(options);
        let query = format!(
            "SELECT m.id, m.slug, m.title, m.yearofrelease, \
                    string_agg(DISTINCT g.name, ',') AS genres, \
                    COALESCE(ROUND(AVG(r.rating), 1), 0)::float4 AS rating, \
                    myr.rating AS userrating \
             FROM movies m \
             LEFT JOIN genres g ON g.movieid = m.id \
             LEFT JOIN ratings r ON r.movieid = m.id \
             LEFT JOIN ratings myr ON myr.movieid = m.id AND myr.userid = $3 \
             WHERE {FILTER_CLAUSE} \
             GROUP BY m.id, myr.rating \
             {order_clause} \
             LIMIT $4 OFFSET $5"
        );
        let rows = sqlx::query_as::<_, MovieListRow>(&query)
            .bind(options.title().map(like_pattern))
            .bind(options.year_of_release())
            .bind(options.viewer_id())
            .bind(options.page_size())
            .bind(options.offset())
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(MovieListRow::into_movie).collect())
    }

    /// Count movies matching the same filters `query` applies.
    pub async fn total_count(
        pool: &PgPool,
        title: Option<&str>,
        year_of_release: Option<i32>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM movies m WHERE {FILTER_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(title.map(like_pattern))
            .bind(year_of_release)
            .fetch_one(pool)
            .await
    }

    /// Whether a movie with this id exists.
    pub async fn exists(pool: &PgPool, id: MovieId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM movies WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Whether any movie already owns `slug`.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM movies WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Genre names of a movie.
    pub async fn genres_for(pool: &PgPool, id: MovieId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM genres WHERE movieid = $1")
            .bind(id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn with_genres(
        pool: &PgPool,
        row: Option<MovieRow>,
    ) -> Result<Option<Movie>, sqlx::Error> {
        match row {
            Some(row) => {
                let genres = Self::genres_for(pool, row.id).await?;
                Ok(Some(row.into_movie(genres)))
            }
            None => Ok(None),
        }
    }

    /// Insert one genre row per genre within an existing transaction.
    async fn insert_genres_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie: &Movie,
    ) -> Result<(), sqlx::Error> {
        for genre in &movie.genres {
            sqlx::query("INSERT INTO genres (movieid, name) VALUES ($1, $2)")
                .bind(movie.id)
                .bind(genre)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn slug_conflict_or(err: sqlx::Error, movie: &Movie) -> DbError {
    if is_unique_violation(&err, SLUG_CONSTRAINT) {
        DbError::SlugConflict {
            slug: movie.slug().to_string(),
        }
    } else {
        DbError::Database(err)
    }
}

/// Build the `ORDER BY` clause from the validated sort. Only static column
/// names are emitted; `m.id` breaks ties so pages never overlap.
fn order_clause(options: &MovieQuery) -> String {
    let Some(sort) = options.sort() else {
        return String::new();
    };

    let column = match sort.field {
        SortField::Title => "m.title",
        SortField::YearOfRelease => "m.yearofrelease",
    };
    // A field named without a `+`/`-` prefix sorts descending.
    let direction = match sort.order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending | SortOrder::Unspecified => "DESC",
    };

    format!("ORDER BY {column} {direction}, m.id")
}

/// Turn a title fragment into a case-sensitive `%fragment%` LIKE pattern,
/// escaping the LIKE metacharacters so the fragment matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
