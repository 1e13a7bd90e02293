//! Movie slug derivation.
//!
//! The slug is the catalog's human-readable identity for a movie. Storage
//! puts a unique constraint on it, so two movies whose titles differ only in
//! punctuation or casing and share a release year cannot both exist.

/// Derive the slug for a movie from its title and release year.
///
/// Characters other than ASCII letters, digits, spaces, underscores and
/// hyphens are dropped, the rest is lower-cased, spaces become hyphens, and
/// `-{year}` is appended.
///
/// ```
/// use cinedex_core::slug::slugify;
///
/// assert_eq!(slugify("The Matrix", 1999), "the-matrix-1999");
/// assert_eq!(slugify("Inception!", 2010), "inception-2010");
/// ```
pub fn slugify(title: &str, year: i32) -> String {
    let stem: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .map(|c| {
            if c == ' ' {
                '-'
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect();

    format!("{stem}-{year}")
}
