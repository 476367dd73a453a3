//! BibTeX records and file I/O.
//!
//! The enrichment pipeline only needs read access to `title`, `author` and
//! `year` and read/write access to `doi`; everything else in an entry is
//! carried through untouched.

mod parser;
mod writer;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result, ResultExt};

pub use parser::{ParseError, parse};
pub use writer::to_bibtex_string;

/// A field value as it appeared in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Braced or quoted text, stored without its outer delimiters
    Text(String),
    /// Macro reference or `#` concatenation involving macros, kept verbatim
    Raw(String),
}

impl FieldValue {
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Text(s) | FieldValue::Raw(s) => s,
        }
    }
}

/// One bibliographic entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Entry type, lower-cased (`article`, `inproceedings`, ...)
    pub entry_type: String,
    /// Cite key
    pub key: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into().to_lowercase(),
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Get a field by (case-insensitive) name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_lowercase())
            .map(FieldValue::as_str)
    }

    /// Set a text field, replacing any previous value
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .insert(name.to_lowercase(), FieldValue::Text(value.into()));
    }

    pub(crate) fn insert_value(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_lowercase(), value);
    }

    /// Fields in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title")
    }

    pub fn author(&self) -> Option<&str> {
        self.field("author")
    }

    pub fn year(&self) -> Option<&str> {
        self.field("year")
    }

    /// The DOI, if present and non-empty
    pub fn doi(&self) -> Option<&str> {
        self.field("doi").filter(|d| !d.trim().is_empty())
    }

    pub fn set_doi(&mut self, doi: impl Into<String>) {
        self.set_field("doi", doi);
    }
}

/// A parsed BibTeX file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    /// `@string` and `@preamble` blocks, verbatim
    pub blocks: Vec<String>,
    /// Entries in file order
    pub records: Vec<Record>,
}

/// Read and parse a BibTeX file
pub fn read_file(path: &Path) -> Result<Bibliography> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    let contents = std::fs::read_to_string(path)
        .with_context(format!("reading {}", path.display()))?;
    parse(&contents)
        .map_err(Error::from)
        .with_context(format!("parsing {}", path.display()))
}

/// Serialize and write a BibTeX file
pub fn write_file(path: &Path, bibliography: &Bibliography) -> Result<()> {
    std::fs::write(path, to_bibtex_string(bibliography))
        .with_context(format!("writing {}", path.display()))
}
