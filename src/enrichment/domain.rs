//! Internal domain models for DOI lookup and enrichment.
//!
//! These types are OUR types - they don't change when the Crossref API changes.
//! Crossref responses get converted into these types in `crossref::adapter`.

use std::fmt;

/// Free-text bibliographic query sent to the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Build a query from the parts that are present.
    ///
    /// Parts are comma-joined and wrapped in literal double quotes, e.g.
    /// `"Deep Learning, LeCun, Yann, 2015"`.
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> Self {
        let joined = parts.into_iter().collect::<Vec<_>>().join(", ");
        Self(format!("\"{}\"", joined))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Best search result picked from a Crossref response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// DOI of the work (never empty)
    pub doi: String,
    /// First title of the work, empty if Crossref returned none
    pub title: String,
    /// Crossref relevance score, truncated to an integer
    pub score: i64,
}

/// Terminal result of resolving one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// DOI written, titles match
    Assigned { doi: String },
    /// Record already had a DOI, nothing was looked up
    AlreadyPresent { doi: String },
    /// DOI written, but the Crossref title differs from the record title
    TitleMismatch {
        doi: String,
        expected: String,
        actual: String,
    },
    /// Lookup failed, record left untouched
    Failed(LookupError),
}

impl Outcome {
    /// Whether this outcome wrote a DOI into the record
    #[cfg(test)]
    pub(crate) fn assigned_doi(&self) -> Option<&str> {
        match self {
            Outcome::Assigned { doi } | Outcome::TitleMismatch { doi, .. } => Some(doi),
            Outcome::AlreadyPresent { .. } | Outcome::Failed(_) => None,
        }
    }
}

/// Errors that can occur during a single lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("lookup cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("no DOI found")]
    NoMatch,
}
