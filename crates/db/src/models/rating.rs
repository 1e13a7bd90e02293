//! Rating aggregate models.

use serde::Serialize;
use sqlx::FromRow;

/// Average rating of a movie together with one viewer's own rating.
///
/// Both values are independently optional: a movie may have no ratings at
/// all, and the viewer may not have rated it.
#[derive(Debug, Clone, Copy, PartialEq, FromRow, Serialize)]
pub struct RatingSummary {
    /// Mean of all ratings, rounded to one decimal.
    pub rating: Option<f32>,
    pub user_rating: Option<i32>,
}
