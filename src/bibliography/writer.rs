//! BibTeX writer.

use std::fmt::Write;

use super::{Bibliography, FieldValue};

/// Serialize a bibliography back to BibTeX.
///
/// `@string`/`@preamble` blocks come first so macros are defined before use,
/// then every entry with its fields in name order.
pub fn to_bibtex_string(bibliography: &Bibliography) -> String {
    let mut out = String::new();

    for block in &bibliography.blocks {
        out.push_str(block);
        out.push_str("\n\n");
    }

    for record in &bibliography.records {
        // Writing into a String cannot fail
        let _ = writeln!(out, "@{}{{{},", record.entry_type, record.key);
        for (name, value) in record.fields() {
            let _ = match value {
                FieldValue::Text(text) => writeln!(out, "  {} = {{{}}},", name, text),
                FieldValue::Raw(raw) => writeln!(out, "  {} = {},", name, raw),
            };
        }
        out.push_str("}\n\n");
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}
