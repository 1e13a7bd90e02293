//! Storage-layer errors.

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Name of the unique constraint on `movies.slug`.
pub const SLUG_CONSTRAINT: &str = "uq_movies_slug";

/// Failure of a repository write that can collide on the movie slug.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Another movie already owns the derived slug. The transaction was
    /// rolled back and nothing was written.
    #[error("A movie with slug '{slug}' already exists")]
    SlugConflict { slug: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Whether `err` is a unique violation of the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
