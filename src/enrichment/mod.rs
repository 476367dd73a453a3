//! DOI enrichment - finds missing DOIs on Crossref.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Query, Candidate, Outcome, LookupError
//! - **API DTOs** (`crossref/dto.rs`) - Exact API response shapes
//! - **Adapter** (`crossref/adapter.rs`) - Converts DTOs and picks the best candidate
//! - **Client** (`crossref/client.rs`) - Rate-limited HTTP client
//! - **Limiter** (`limiter.rs`) - Token bucket shared by every lookup of a run
//! - **Resolver** (`resolver.rs`) - Per-record decision and outcome classification
//! - **Service** (`service.rs`) - Concurrent fan-out over all records and reporting
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::EnrichmentService;
//!
//! let service = EnrichmentService::from_config(&config)?;
//! let report = service.run(&cancel, &mut bibliography.records).await;
//! report.log();
//! ```

pub mod crossref;
pub mod domain;
pub mod limiter;
pub mod resolver;
pub mod service;
pub mod traits;

pub use domain::{Candidate, LookupError, Outcome, Query};
pub use limiter::RateLimiter;
pub use resolver::RecordResolver;
pub use service::{EnrichmentService, Report, ReportEntry, Summary};
