//! Decade buckets.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A decade, identified by its first year (1980 for "1980s").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Decade(i32);

impl Decade {
    /// The decade containing `year`. The start year is inclusive.
    pub const fn of(year: i32) -> Self {
        Self(year.div_euclid(10) * 10)
    }

    /// First year of the decade.
    pub const fn start(self) -> i32 {
        self.0
    }

    /// Whether `year` falls inside this decade.
    pub const fn contains(self, year: i32) -> bool {
        year >= self.0 && year < self.0 + 10
    }

    /// Display label, e.g. `"1980s"`.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Decade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Error returned when a decade label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decade {0:?}; expected e.g. 1980 or 1980s")]
pub struct ParseDecadeError(String);

impl FromStr for Decade {
    type Err = ParseDecadeError;

    /// Accepts `"1980s"` or any year (`"1987"` parses to the 1980s).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
        digits
            .parse::<i32>()
            .map(Self::of)
            .map_err(|_| ParseDecadeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_by_floor() {
        assert_eq!(Decade::of(1987).label(), "1980s");
        assert_eq!(Decade::of(2020).label(), "2020s");
        assert_eq!(Decade::of(1989).start(), 1980);
        assert_eq!(Decade::of(1990).start(), 1990);
    }

    #[test]
    fn contains_start_not_next_start() {
        let d = Decade::of(1940);
        assert!(d.contains(1940));
        assert!(d.contains(1949));
        assert!(!d.contains(1950));
        assert!(!d.contains(1939));
    }

    #[test]
    fn parses_labels_and_years() {
        assert_eq!("1980s".parse::<Decade>().unwrap(), Decade::of(1980));
        assert_eq!("1987".parse::<Decade>().unwrap(), Decade::of(1980));
        assert!("eighties".parse::<Decade>().is_err());
    }

    #[test]
    fn rejects_repeated_suffix() {
        assert!("1980ss".parse::<Decade>().is_err());
        assert!("1980sss".parse::<Decade>().is_err());
        let err = "s".parse::<Decade>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid decade \"s\"; expected e.g. 1980 or 1980s"
        );
    }
}
