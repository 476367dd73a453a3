//! Test utilities and fixtures for doizer tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{mock_record, crossref_body};
//!
//! let record = mock_record("lecun2015", "Deep learning");
//! let body = crossref_body(&[("10.1038/nature14539", "Deep learning", 73.0)]);
//! ```

use std::num::NonZeroU32;
use std::sync::Arc;

use crate::bibliography::Record;
use crate::enrichment::RateLimiter;

/// Creates an `article` record with only a title.
///
/// Add more fields with [`Record::with_field`]:
///
/// ```ignore
/// let record = mock_record("k", "Title").with_field("year", "2020");
/// ```
pub fn mock_record(key: &str, title: &str) -> Record {
    Record::new("article", key).with_field("title", title)
}

/// Builds a Crossref works search body from `(doi, title, score)` triples.
pub fn crossref_body(items: &[(&str, &str, f64)]) -> String {
    let items: Vec<_> = items
        .iter()
        .map(|(doi, title, score)| {
            serde_json::json!({
                "DOI": doi,
                "title": [title],
                "score": score,
            })
        })
        .collect();

    serde_json::json!({
        "status": "ok",
        "message-type": "work-list",
        "message": { "items": items },
    })
    .to_string()
}

/// A limiter generous enough never to slow a test down.
pub fn test_limiter() -> Arc<RateLimiter> {
    let permits = NonZeroU32::new(1000).expect("non-zero");
    Arc::new(RateLimiter::new(permits, permits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::crossref::dto::WorksResponse;

    #[test]
    fn test_mock_record_defaults() {
        let record = mock_record("k1", "A Title");
        assert_eq!(record.key, "k1");
        assert_eq!(record.entry_type, "article");
        assert_eq!(record.title(), Some("A Title"));
        assert!(record.doi().is_none());
    }

    #[test]
    fn test_crossref_body_parses() {
        let body = crossref_body(&[("10.1/a", "A", 1.5)]);
        let response: WorksResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(response.message.items[0].doi.as_deref(), Some("10.1/a"));
        assert_eq!(response.message.items[0].title[0], "A");
    }
}
