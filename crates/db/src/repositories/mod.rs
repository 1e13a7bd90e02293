//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod movie_repo;
pub mod rating_repo;

pub use movie_repo::MovieRepo;
pub use rating_repo::RatingRepo;
