use cinedex_core::error::CoreError;
use cinedex_db::DbError;

/// Error returned by the service layer.
///
/// Validation and conflict outcomes arrive as [`CoreError`]; anything the
/// database reports is passed through unmodified.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Message reported when a movie's slug is already taken.
pub const MOVIE_EXISTS: &str = "This movie already exists in the system";

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::SlugConflict { .. } => Self::Core(CoreError::Conflict(MOVIE_EXISTS.into())),
            DbError::Database(e) => Self::Database(e),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn slug_conflict_becomes_core_conflict() {
        let err: ServiceError = DbError::SlugConflict {
            slug: "inception-2010".into(),
        }
        .into();
        assert_matches!(err, ServiceError::Core(CoreError::Conflict(ref msg)) if msg == MOVIE_EXISTS);
    }

    #[test]
    fn database_errors_pass_through() {
        let err: ServiceError = DbError::Database(sqlx::Error::RowNotFound).into();
        assert_matches!(err, ServiceError::Database(sqlx::Error::RowNotFound));
    }
}
