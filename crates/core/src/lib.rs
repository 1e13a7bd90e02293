//! Domain logic for the movie catalog.
//!
//! Everything here is pure: slug derivation, query option guarding,
//! rating and movie draft validation. Storage lives in `cinedex-db`.

pub mod error;
pub mod movie;
pub mod query;
pub mod rating;
pub mod slug;
pub mod types;
pub mod validation;
