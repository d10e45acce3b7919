//! [`LikePattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// SQL `LIKE` pattern matching any value containing the given input.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] out of the given `input`, lowercasing it
    /// and escaping its wildcards.
    #[must_use]
    pub fn contains(input: &str) -> Self {
        Self(format!(
            "%{}%",
            input
                .to_lowercase()
                .replace('\\', r"\\")
                .replace('%', r"\%")
                .replace('_', r"\_"),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::LikePattern;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(LikePattern::contains("Toronto").to_string(), "%toronto%");
        assert_eq!(
            LikePattern::contains(r"50%_off\").to_string(),
            r"%50\%\_off\\%",
        );
    }
}
