//! Per-record DOI resolution.
//!
//! Decides whether a record needs a lookup, builds the query, and turns the
//! search result into an [`Outcome`]. Lookups are never retried; a failed
//! search fails that record for the whole run.

use tokio_util::sync::CancellationToken;

use super::domain::{Outcome, Query};
use super::traits::MetadataApi;
use crate::bibliography::Record;

/// Resolves records against a metadata search backend
pub struct RecordResolver<A> {
    api: A,
}

impl<A: MetadataApi> RecordResolver<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    #[cfg(test)]
    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    /// Resolve one record, writing the DOI into it on success.
    ///
    /// The DOI is written even when titles differ; the caller gets a
    /// [`Outcome::TitleMismatch`] to flag the record for review.
    pub async fn resolve(&self, cancel: &CancellationToken, record: &mut Record) -> Outcome {
        if let Some(doi) = record.doi() {
            return Outcome::AlreadyPresent {
                doi: doi.to_string(),
            };
        }

        let query = build_query(record);
        tracing::debug!(key = %record.key, %query, "Searching Crossref");

        let candidate = match self.api.search(cancel, &query).await {
            Ok(candidate) => candidate,
            Err(e) => return Outcome::Failed(e),
        };

        let expected = record.title().unwrap_or_default().to_string();
        record.set_doi(candidate.doi.clone());

        if titles_match(&expected, &candidate.title) {
            Outcome::Assigned { doi: candidate.doi }
        } else {
            Outcome::TitleMismatch {
                doi: candidate.doi,
                expected,
                actual: candidate.title,
            }
        }
    }
}

/// Build the bibliographic query from title, author and year, skipping
/// whichever are absent.
pub fn build_query(record: &Record) -> Query {
    Query::from_parts([record.title(), record.author(), record.year()].into_iter().flatten())
}

/// Case-insensitive exact comparison; no other normalization.
fn titles_match(expected: &str, actual: &str) -> bool {
    expected.to_lowercase() == actual.to_lowercase()
}
