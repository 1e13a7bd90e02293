//! Rating value validation.

use crate::error::CoreError;
use crate::validation::ValidationErrors;

/// Field key used when a rating value is rejected.
pub const FIELD_RATING: &str = "Rating";

/// Minimum allowed rating value.
pub const MIN_RATING: i32 = 1;

/// Maximum allowed rating value.
pub const MAX_RATING: i32 = 5;

/// Validate that `rating` is within `MIN_RATING..=MAX_RATING`.
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationErrors::single(
            FIELD_RATING,
            format!("Rating must be between {MIN_RATING} and {MAX_RATING}."),
        )
        .into())
    }
}
