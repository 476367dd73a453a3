//! Crossref API Data Transfer Objects
//!
//! These types match what the Crossref `/works` search returns.
//! Only the fields we read are declared; serde ignores the rest.
//! DO NOT use these types outside the crossref module - convert to domain types.
//!
//! API Reference: https://api.crossref.org/swagger-ui/index.html

use serde::Deserialize;

/// Top-level envelope of a works search
#[derive(Debug, Clone, Deserialize)]
pub struct WorksResponse {
    pub message: WorksMessage,
}

/// Result page of a works search
#[derive(Debug, Clone, Deserialize)]
pub struct WorksMessage {
    pub items: Vec<WorkItem>,
}

/// One work in the search results
#[derive(Debug, Clone, Deserialize)]
pub struct WorkItem {
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,
    /// Crossref returns titles as a list; the first one is the main title
    #[serde(default)]
    pub title: Vec<String>,
    /// Relevance score (a float in practice)
    #[serde(default)]
    pub score: f64,
}
