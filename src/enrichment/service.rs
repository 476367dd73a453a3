//! Enrichment service - resolves DOIs for a whole bibliography
//!
//! Every record gets its own resolution future and all of them run
//! concurrently. Throughput is bounded by the single rate limiter inside the
//! Crossref client, not by the number of futures. All futures are polled
//! inside the caller's task: a lookup error stays in that record's
//! [`Outcome`], but a panic unwinds the whole run. The run always waits for
//! every record and reports them in input order.

use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::bibliography::Record;
use crate::config::Config;
use crate::enrichment::{
    crossref::CrossrefClient,
    domain::Outcome,
    limiter::RateLimiter,
    resolver::RecordResolver,
    traits::MetadataApi,
};

/// Service for adding missing DOIs to records
pub struct EnrichmentService<A> {
    resolver: RecordResolver<A>,
}

impl EnrichmentService<CrossrefClient> {
    /// Create a service backed by Crossref, with one limiter for the whole run
    pub fn from_config(config: &Config) -> Result<Self, crate::config::ConfigError> {
        let limiter = Arc::new(RateLimiter::new(
            config.limiter.rate()?,
            config.limiter.burst()?,
        ));
        let client = CrossrefClient::new(&config.crossref, limiter)
            .map_err(|e| crate::config::ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::new(client))
    }
}

impl<A: MetadataApi> EnrichmentService<A> {
    pub fn new(api: A) -> Self {
        Self {
            resolver: RecordResolver::new(api),
        }
    }

    /// Resolve every record and return one report entry per record, in input order.
    ///
    /// Cancelling `cancel` makes lookups that have not finished yet resolve to
    /// `Failed(Cancelled)`; outcomes already produced are kept.
    pub async fn run(&self, cancel: &CancellationToken, records: &mut [Record]) -> Report {
        tracing::info!("Resolving DOIs for {} records", records.len());

        let resolver = &self.resolver;
        let lookups = records
            .iter_mut()
            .enumerate()
            .map(move |(index, record)| async move {
                let outcome = resolver.resolve(cancel, record).await;
                ReportEntry {
                    index,
                    cite_key: record.key.clone(),
                    outcome,
                }
            });

        Report {
            entries: join_all(lookups).await,
        }
    }
}

/// Outcome of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Position of the record in the input
    pub index: usize,
    pub cite_key: String,
    pub outcome: Outcome,
}

/// Per-record outcomes of a run, in input order
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

/// Outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub assigned: usize,
    pub mismatched: usize,
    pub already_present: usize,
    pub failed: usize,
}

impl Report {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for entry in &self.entries {
            match entry.outcome {
                Outcome::Assigned { .. } => summary.assigned += 1,
                Outcome::TitleMismatch { .. } => summary.mismatched += 1,
                Outcome::AlreadyPresent { .. } => summary.already_present += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Log one line per record, then the totals.
    ///
    /// A title mismatch logs as a successful assignment followed by a warning.
    pub fn log(&self) {
        for entry in &self.entries {
            let prefix = format!("{:03}: {}", entry.index, entry.cite_key);
            match &entry.outcome {
                Outcome::Assigned { doi } => {
                    tracing::info!("{} Got DOI {}", prefix, doi);
                }
                Outcome::AlreadyPresent { doi } => {
                    tracing::info!("{} skipped: existing DOI: {}", prefix, doi);
                }
                Outcome::TitleMismatch {
                    doi,
                    expected,
                    actual,
                } => {
                    tracing::info!("{} Got DOI {}", prefix, doi);
                    tracing::warn!(
                        "{} title don't match: expected {:?}, actual {:?}",
                        prefix,
                        expected,
                        actual
                    );
                }
                Outcome::Failed(e) => {
                    tracing::error!("{} {}", prefix, e);
                }
            }
        }

        let summary = self.summary();
        tracing::info!(
            "Done: {} assigned, {} flagged for review, {} already had a DOI, {} failed",
            summary.assigned,
            summary.mismatched,
            summary.already_present,
            summary.failed
        );
    }
}
