//! Trait definitions for external metadata lookups.
//!
//! The resolver is generic over [`MetadataApi`], so tests can substitute
//! mock implementations for the real Crossref client.
//!
//! # Example
//!
//! ```ignore
//! use doizer::enrichment::traits::MetadataApi;
//!
//! async fn lookup<T: MetadataApi>(client: &T, cancel: &CancellationToken, q: &Query) {
//!     let candidate = client.search(cancel, q).await?;
//! }
//! ```

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::domain::{Candidate, LookupError, Query};

/// Trait for bibliographic search.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Search for a query and return the single best candidate.
    async fn search(
        &self,
        cancel: &CancellationToken,
        query: &Query,
    ) -> Result<Candidate, LookupError>;
}

#[async_trait]
impl MetadataApi for super::crossref::CrossrefClient {
    async fn search(
        &self,
        cancel: &CancellationToken,
        query: &Query,
    ) -> Result<Candidate, LookupError> {
        self.search(cancel, query).await
    }
}
