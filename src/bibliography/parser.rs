//! BibTeX reader.
//!
//! Handles `@type{key, name = value, ...}` entries with braced, quoted, bare
//! and `#`-concatenated values. `@comment` blocks and text between entries
//! are dropped; `@string` and `@preamble` blocks are kept verbatim.

use super::{Bibliography, FieldValue, Record};

/// Error raised for malformed BibTeX input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Parse BibTeX source into a [`Bibliography`]
pub fn parse(input: &str) -> Result<Bibliography, ParseError> {
    Parser::new(input).parse()
}

/// One piece of a (possibly concatenated) value
enum Piece {
    Text(String),
    Number(String),
    Macro(String),
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn parse(mut self) -> Result<Bibliography, ParseError> {
        let mut bibliography = Bibliography::default();

        loop {
            // Anything outside an @-block is a comment
            while let Some(c) = self.peek() {
                if c == '@' {
                    break;
                }
                self.bump();
            }
            if self.peek().is_none() {
                break;
            }

            let start = self.pos;
            self.bump();
            self.skip_whitespace();
            let entry_type = self.identifier().to_lowercase();
            self.skip_whitespace();
            // A stray '@' (e.g. in an email address) is just comment text
            let close = match self.peek() {
                Some('{') if !entry_type.is_empty() => '}',
                Some('(') if !entry_type.is_empty() => ')',
                _ => continue,
            };
            self.bump();

            match entry_type.as_str() {
                "comment" => {
                    self.skip_block(close)?;
                }
                "string" | "preamble" => {
                    self.skip_block(close)?;
                    let raw: String = self.chars[start..self.pos].iter().collect();
                    bibliography.blocks.push(raw);
                }
                _ => {
                    let record = self.entry(entry_type, close)?;
                    bibliography.records.push(record);
                }
            }
        }

        Ok(bibliography)
    }

    /// Parse the body of an entry, after its opening delimiter
    fn entry(&mut self, entry_type: String, close: char) -> Result<Record, ParseError> {
        self.skip_whitespace();
        let key = self.take_while(|c| !c.is_whitespace() && c != ',' && c != close);
        if key.is_empty() {
            return Err(self.error("expected cite key"));
        }
        let mut record = Record::new(entry_type, key);

        self.skip_whitespace();
        match self.bump() {
            Some(',') => {}
            Some(c) if c == close => return Ok(record),
            _ => return Err(self.error(format!("expected ',' after cite key '{}'", record.key))),
        }

        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(record);
            }

            let name = self.identifier();
            if name.is_empty() {
                return Err(self.error(format!("expected field name in entry '{}'", record.key)));
            }
            self.skip_whitespace();
            if self.bump() != Some('=') {
                return Err(self.error(format!("expected '=' after field '{}'", name)));
            }
            self.skip_whitespace();
            let value = self.value(close)?;
            record.insert_value(&name, value);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => {}
                Some(c) if c == close => return Ok(record),
                _ => {
                    return Err(self.error(format!(
                        "expected ',' or '{}' after field '{}'",
                        close, name
                    )));
                }
            }
        }
    }

    /// Parse a field value, joining `#`-separated pieces
    fn value(&mut self, close: char) -> Result<FieldValue, ParseError> {
        let mut pieces = vec![self.piece(close)?];
        loop {
            self.skip_whitespace();
            if self.peek() != Some('#') {
                break;
            }
            self.bump();
            self.skip_whitespace();
            pieces.push(self.piece(close)?);
        }

        let has_macro = pieces.iter().any(|p| matches!(p, Piece::Macro(_)));
        if !has_macro {
            let text = pieces
                .into_iter()
                .map(|p| match p {
                    Piece::Text(s) | Piece::Number(s) | Piece::Macro(s) => s,
                })
                .collect();
            return Ok(FieldValue::Text(text));
        }

        let raw = pieces
            .into_iter()
            .map(|p| match p {
                Piece::Text(s) => format!("{{{}}}", s),
                Piece::Number(s) | Piece::Macro(s) => s,
            })
            .collect::<Vec<_>>()
            .join(" # ");
        Ok(FieldValue::Raw(raw))
    }

    fn piece(&mut self, close: char) -> Result<Piece, ParseError> {
        match self.peek() {
            Some('{') => {
                self.bump();
                self.delimited('}').map(Piece::Text)
            }
            Some('"') => {
                self.bump();
                self.delimited('"').map(Piece::Text)
            }
            Some(c) if c != close && c != ',' && !c.is_whitespace() => {
                let token = self.identifier();
                if token.is_empty() {
                    return Err(self.error(format!("unexpected character '{}' in value", c)));
                }
                if token.chars().all(|c| c.is_ascii_digit()) {
                    Ok(Piece::Number(token))
                } else {
                    Ok(Piece::Macro(token))
                }
            }
            _ => Err(self.error("expected field value")),
        }
    }

    /// Read text up to `end` at brace depth zero; the opening delimiter is
    /// already consumed. Inner braces are kept.
    fn delimited(&mut self, end: char) -> Result<String, ParseError> {
        let start_line = self.line;
        let mut depth = 0usize;
        let mut text = String::new();

        while let Some(c) = self.bump() {
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == end && depth == 0 => return Ok(text),
                '}' => {
                    return Err(self.error("unbalanced '}' in value"));
                }
                _ => {}
            }
            text.push(c);
        }

        Err(ParseError {
            line: start_line,
            message: "unterminated value".to_string(),
        })
    }

    /// Skip to the matching close delimiter of a block
    fn skip_block(&mut self, close: char) -> Result<(), ParseError> {
        let open = if close == '}' { '{' } else { '(' };
        let start_line = self.line;
        let mut depth = 0usize;

        while let Some(c) = self.bump() {
            if c == open {
                depth += 1;
            } else if c == close {
                if depth == 0 {
                    return Ok(());
                }
                depth -= 1;
            }
        }

        Err(ParseError {
            line: start_line,
            message: "unterminated block".to_string(),
        })
    }

    fn identifier(&mut self) -> String {
        self.take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+' | '/'))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_entry() {
        let bib = parse(
            r#"
@Article{lecun2015,
  Title = {Deep Learning},
  author = "LeCun, Yann and Bengio, Yoshua",
  year = 2015,
}
"#,
        )
        .unwrap();

        assert_eq!(bib.records.len(), 1);
        let record = &bib.records[0];
        assert_eq!(record.entry_type, "article");
        assert_eq!(record.key, "lecun2015");
        assert_eq!(record.title(), Some("Deep Learning"));
        assert_eq!(record.author(), Some("LeCun, Yann and Bengio, Yoshua"));
        assert_eq!(record.year(), Some("2015"));
        assert_eq!(record.doi(), None);
    }

    #[test]
    fn test_nested_braces_are_kept() {
        let bib = parse("@misc{k, title = {The {LaTeX} Companion}}").unwrap();
        assert_eq!(bib.records[0].title(), Some("The {LaTeX} Companion"));
    }

    #[test]
    fn test_quoted_value_may_contain_braced_quote() {
        let bib = parse(r#"@misc{k, title = "Say {"}hi{"}"}"#).unwrap();
        assert_eq!(bib.records[0].title(), Some(r#"Say {"}hi{"}"#));
    }

    #[test]
    fn test_concatenation() {
        let bib = parse(r#"@misc{k, note = "a" # {b} # 3, month = jan # " 1"}"#).unwrap();
        let record = &bib.records[0];
        assert_eq!(record.field("note"), Some("ab3"));
        assert_eq!(
            record.fields().find(|(n, _)| *n == "month").unwrap().1,
            &FieldValue::Raw("jan # { 1}".to_string())
        );
    }

    #[test]
    fn test_parenthesised_entry_and_no_trailing_comma() {
        let bib = parse("@book(knuth84, title = {The TeXbook}, year = 1984)").unwrap();
        assert_eq!(bib.records[0].key, "knuth84");
        assert_eq!(bib.records[0].year(), Some("1984"));
    }

    #[test]
    fn test_comments_and_blocks() {
        let bib = parse(
            r#"Some free text that is ignored.
@comment{this {is} dropped}
@string{acm = "ACM Press"}
@preamble{"\newcommand{\noop}[1]{}"}
@inproceedings{a1, publisher = acm}
"#,
        )
        .unwrap();

        assert_eq!(bib.blocks.len(), 2);
        assert!(bib.blocks[0].starts_with("@string{acm"));
        assert!(bib.blocks[1].starts_with("@preamble{"));
        assert_eq!(bib.records.len(), 1);
        assert_eq!(bib.records[0].field("publisher"), Some("acm"));
    }

    #[test]
    fn test_stray_at_sign_is_comment_text() {
        let bib = parse("Contact me@example.org for details.\n@misc{k, year = 2000}").unwrap();
        assert_eq!(bib.records.len(), 1);
        assert_eq!(bib.records[0].key, "k");
    }

    #[test]
    fn test_entry_without_fields() {
        let bib = parse("@misc{lonely}").unwrap();
        assert_eq!(bib.records[0].key, "lonely");
        assert_eq!(bib.records[0].fields().count(), 0);
    }

    #[test]
    fn test_multiple_entries_keep_order() {
        let bib = parse("@a{one, x = 1} @b{two, x = 2} @c{three, x = 3}").unwrap();
        let keys: Vec<_> = bib.records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_unterminated_value_reports_start_line() {
        let err = parse("@article{k,\n  title = {never closed\n\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_missing_equals() {
        let err = parse("@article{k,\n  title {x}}").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("'='"));
    }

    #[test]
    fn test_missing_key() {
        assert!(parse("@article{, title = {x}}").is_err());
    }
}
