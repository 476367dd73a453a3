//! Adapter layer: Convert Crossref DTOs to domain models
//!
//! This is the ONLY place where Crossref DTO types are converted to domain types.

use super::dto;
use crate::enrichment::domain::{Candidate, LookupError};

/// Pick the best candidate from a works search response
pub fn to_candidate(response: dto::WorksResponse) -> Result<Candidate, LookupError> {
    select_best(response.message.items).ok_or(LookupError::NoMatch)
}

/// Select the highest scoring item that carries a DOI.
///
/// Items are visited in response order and a later item only wins on a
/// strictly greater score, so ties keep the item Crossref ranked first.
pub fn select_best(items: impl IntoIterator<Item = dto::WorkItem>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for item in items {
        let Some(candidate) = to_domain(item) else {
            continue;
        };
        match &best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }

    best
}

fn to_domain(item: dto::WorkItem) -> Option<Candidate> {
    let doi = item.doi.filter(|d| !d.is_empty())?;
    Some(Candidate {
        doi,
        title: item.title.into_iter().next().unwrap_or_default(),
        score: item.score as i64,
    })
}
