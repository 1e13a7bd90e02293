//! Domain model structs and row mappings.
//!
//! Each submodule contains the public entity returned by repositories and
//! the crate-private `FromRow` structs that match query result shapes.

pub mod movie;
pub mod rating;
