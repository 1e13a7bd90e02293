//! Movie and rating operations over a `PgPool`.
//!
//! Each operation validates caller input with `cinedex-core` before any
//! storage call, then delegates to the `cinedex-db` repositories. Writes are
//! logged with `tracing`.

pub mod error;
pub mod movie_service;
pub mod rating_service;

pub use error::{ServiceError, ServiceResult};
pub use movie_service::MovieService;
pub use rating_service::RatingService;
