//! Revision dates for modules and schema sources.
//!
//! A module may declare any number of `revision` statements; its effective
//! revision is the latest declared date. A module that declares none is
//! keyed by the [`Revision::Undated`] sentinel so that dated and undated
//! declarations of the same namespace stay distinguishable.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Revision date of a module or schema source.
///
/// `Undated` orders before every dated revision, so "latest revision"
/// selection works with plain `max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Revision {
    /// Sentinel for a source that declares no revision statement.
    Undated,
    /// A declared `yyyy-mm-dd` revision date.
    Date(NaiveDate),
}

impl Revision {
    /// Parse a `yyyy-mm-dd` revision argument.
    pub fn parse(s: &str) -> Result<Self, RevisionParseError> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| RevisionParseError(s.to_string()))?;
        Ok(Revision::Date(date))
    }

    /// Whether this is the undated sentinel.
    pub fn is_undated(&self) -> bool {
        matches!(self, Revision::Undated)
    }
}

impl Default for Revision {
    fn default() -> Self {
        Revision::Undated
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Undated => write!(f, "undated"),
            Revision::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Error returned when a revision argument is not a `yyyy-mm-dd` date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid revision date '{0}', expected yyyy-mm-dd")]
pub struct RevisionParseError(pub String);
