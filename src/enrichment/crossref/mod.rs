//! Crossref API integration
//!
//! Finds the DOI of a work from its title, authors and year using the
//! bibliographic search of the Crossref works index.
//!
//! API docs: https://api.crossref.org/swagger-ui/index.html

pub mod dto;
mod adapter;
mod client;

pub use adapter::{select_best, to_candidate};
pub use client::CrossrefClient;
