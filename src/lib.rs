//! doizer - adds missing DOIs to BibTeX files.
//!
//! Every entry without a DOI is looked up on Crossref by title, authors and
//! year; the best scoring match's DOI is written back. Entries whose Crossref
//! title differs from their own are still updated, but flagged in the log.

pub mod bibliography;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
#[cfg(test)]
pub mod test_utils;

pub use bibliography::{Bibliography, Record};
pub use config::Config;
pub use enrichment::{EnrichmentService, Outcome, Report};
pub use error::{Error, Result};
