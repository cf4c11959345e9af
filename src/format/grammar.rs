//! Line grammar
//!
//! Turns one decoded line into an optional label plus its ordered fields.
//! Fields are separated by spaces; a field containing spaces is wrapped in
//! double quotes (an embedded quote is written `\"`, a backslash `\\`). A
//! `{ ... }` token is an object-reference list and comes back as one
//! [`Field::ObjectList`].

use crate::error::ParseErrorKind;

/// One field of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Text(String),
    ObjectList(Vec<String>),
}

impl Field {
    /// The text of a plain field; `None` for an object list
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::ObjectList(_) => None,
        }
    }

    /// A lone `{` or `}` marking the start or end of a ledger-line block
    pub fn is_brace(&self) -> bool {
        matches!(self, Self::Text(s) if s == "{" || s == "}")
    }
}

/// A tokenized line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Upper-cased label including the `#`; `None` for a continuation line
    pub label: Option<String>,
    pub fields: Vec<Field>,
}

impl Line {
    /// True when the only content of the line is a brace marker
    pub fn is_brace_marker(&self) -> bool {
        self.label.is_none() && self.fields.len() == 1 && self.fields[0].is_brace()
    }
}

/// Normalize a raw line: tabs become spaces and the ends are trimmed
pub fn normalize(raw: &str) -> String {
    raw.replace('\t', " ").trim().to_string()
}

/// Tokenize a line. Returns `None` for a blank line.
pub fn tokenize(raw: &str) -> Result<Option<Line>, ParseErrorKind> {
    let text = normalize(raw);
    if text.is_empty() {
        return Ok(None);
    }

    let (label, rest) = if text.starts_with('#') {
        match text.split_once(' ') {
            Some((label, rest)) => (Some(label.to_uppercase()), rest),
            None => (Some(text.to_uppercase()), ""),
        }
    } else {
        (None, text.as_str())
    };

    let fields = split_fields(rest)?;
    Ok(Some(Line { label, fields }))
}

fn split_fields(text: &str) -> Result<Vec<Field>, ParseErrorKind> {
    let mut fields = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' => {
                chars.next();
            }
            '{' => {
                chars.next();
                let mut inner = String::new();
                let mut closed = false;
                let mut in_quotes = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' if in_quotes => {
                            inner.push(c);
                            if let Some(next) = chars.next() {
                                inner.push(next);
                            }
                        }
                        '"' => {
                            in_quotes = !in_quotes;
                            inner.push(c);
                        }
                        '}' if !in_quotes => {
                            closed = true;
                            break;
                        }
                        _ => inner.push(c),
                    }
                }
                if closed {
                    let items = split_fields(&inner)?
                        .into_iter()
                        .filter_map(|f| match f {
                            Field::Text(s) => Some(s),
                            Field::ObjectList(_) => None,
                        })
                        .collect();
                    fields.push(Field::ObjectList(items));
                } else if inner.trim().is_empty() {
                    fields.push(Field::Text("{".to_string()));
                } else {
                    return Err(ParseErrorKind::UnterminatedObjectList);
                }
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.peek() {
                            Some(&next @ ('"' | '\\')) => {
                                chars.next();
                                value.push(next);
                            }
                            _ => value.push(c),
                        },
                        '"' => break,
                        _ => value.push(c),
                    }
                }
                fields.push(Field::Text(value));
            }
            _ => {
                let mut value = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ' ' || (c == '{' && !value.is_empty()) {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
                fields.push(Field::Text(value));
            }
        }
    }

    Ok(fields)
}

/// Quote a field for output when it is empty or would not survive tokenizing bare
pub fn quote(field: &str) -> String {
    let needs_quotes = field.is_empty()
        || field.starts_with('#')
        || field
            .chars()
            .any(|c| c == ' ' || c == '\t' || c == '"' || c == '{' || c == '}');
    if needs_quotes {
        let escaped = field.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    } else {
        field.to_string()
    }
}
