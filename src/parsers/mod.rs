//! Hand-written parsers for the four supported configuration dialects
//!
//! Each format is an independent [`FormatParser`]; they share only the
//! [`ConfigValue`] model, the [`ParseError`] type and line bookkeeping.

pub mod ini;
pub mod json;
pub mod toml;
pub mod yaml;

pub use self::ini::{parse_ini, IniParser};
pub use self::json::{parse_json, JsonParser};
pub use self::toml::{parse_toml, TomlParser};
pub use self::yaml::{parse_yaml, YamlParser};

use crate::format::Format;
use crate::models::ConfigValue;
use thiserror::Error;

/// Syntax error raised by one of the parsers. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("JSON syntax error on line {line}: {message}")]
    Json { line: usize, message: String },
    #[error("YAML syntax error on line {line}: {message}")]
    Yaml { line: usize, message: String },
    #[error("TOML syntax error on line {line}: {message}")]
    Toml { line: usize, message: String },
    #[error("INI syntax error on line {line}: {message}")]
    Ini { line: usize, message: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Json { line, .. }
            | ParseError::Yaml { line, .. }
            | ParseError::Toml { line, .. }
            | ParseError::Ini { line, .. } => *line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::Json { message, .. }
            | ParseError::Yaml { message, .. }
            | ParseError::Toml { message, .. }
            | ParseError::Ini { message, .. } => message,
        }
    }

    pub fn format(&self) -> Format {
        match self {
            ParseError::Json { .. } => Format::Json,
            ParseError::Yaml { .. } => Format::Yaml,
            ParseError::Toml { .. } => Format::Toml,
            ParseError::Ini { .. } => Format::Ini,
        }
    }
}

/// Common contract of every format parser
pub trait FormatParser {
    /// Parse a whole document into a fresh value tree
    fn parse(&self, text: &str) -> Result<ConfigValue, ParseError>;
}

/// Byte offset to line number lookup over a precomputed table of line starts
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line containing `offset`; equals the number of newlines
    /// before `offset` plus one.
    pub(crate) fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }
}

/// Remove a trailing `#` comment that is outside quotes and either starts the
/// text or follows whitespace.
pub(crate) fn strip_inline_comment(text: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev_is_space = true;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q == '"' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '#' && prev_is_space {
                    return &text[..i];
                }
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
            }
        }
        prev_is_space = c.is_whitespace();
    }

    text
}

/// Failure of [`split_top_level`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SplitError {
    UnterminatedQuote,
}

/// Split `text` on commas that are outside quotes and outside nested
/// `[]`/`{}` brackets. Backslash escapes the next character inside quotes.
pub(crate) fn split_top_level(text: &str) -> Result<Vec<&str>, SplitError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err(SplitError::UnterminatedQuote);
    }

    parts.push(&text[start..]);
    Ok(parts)
}
