//! Tree-directed SQL formatter.
//!
//! [`format`] parses a document, rewrites the tree with line breaks and
//! indentation, trims whitespace that would trail at end-of-line, and
//! returns one text edit spanning the parsed tokens. Imperfect input
//! formats on a best-effort basis; only empty input and tokenizer failures
//! refuse outright.
//!
//! # Usage
//!
//! ```
//! use plane_format::{format, DocumentFormattingParams, FormatConfig, FormattingOptions};
//!
//! let params = DocumentFormattingParams {
//!     options: FormattingOptions { tab_size: 2, insert_spaces: true },
//! };
//! let edits = format("SELECT a, b FROM t", &params, &FormatConfig::default()).unwrap();
//! assert_eq!(edits[0].new_text, "SELECT\n  a,\n  b\nFROM\n  t");
//! ```

pub mod config;
pub mod format;
pub mod lsp;
mod nodes;
pub mod trailing;

pub use config::FormatConfig;
pub use format::{eval, FormatEnvironment};
pub use lsp::{DocumentFormattingParams, FormattingOptions, Position, Range, TextEdit};
pub use trailing::trim_trailing_whitespace;

use plane_lexer::TokenizeError;
use plane_parser::{ParseError, Parser};
use plane_syntax::RenderOptions;

/// Formatting failure.
#[derive(Debug)]
pub enum FormatError {
    /// The document was empty.
    EmptyInput,
    /// The tokenizer rejected the document.
    Tokenize(TokenizeError),
    /// A parse pass rejected the tree.
    Parse(ParseError),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::EmptyInput => write!(f, "empty input"),
            FormatError::Tokenize(err) => write!(f, "tokenize failed: {err}"),
            FormatError::Parse(err) => write!(f, "parse failed: {err}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::EmptyInput => None,
            FormatError::Tokenize(err) => Some(err),
            FormatError::Parse(err) => Some(err),
        }
    }
}

/// Formats a whole document into a single text edit spanning the parsed
/// tree's first through last token.
pub fn format(
    text: &str,
    params: &DocumentFormattingParams,
    config: &FormatConfig,
) -> Result<Vec<TextEdit>, FormatError> {
    if text.is_empty() {
        return Err(FormatError::EmptyInput);
    }
    let parser = Parser::new(text).map_err(FormatError::Tokenize)?;
    let parsed = parser.parse().map_err(FormatError::Parse)?;

    let start = parsed.pos().unwrap_or_default();
    let end = parsed.end().unwrap_or_default();

    let mut env = FormatEnvironment::new(params.options);
    let formatted = eval(parsed, &mut env);
    let formatted = trim_trailing_whitespace(formatted);

    let opts = RenderOptions {
        lowercase_keywords: config.lowercase_keywords,
    };
    Ok(vec![TextEdit {
        range: Range {
            start: Position::new(start.line, start.col),
            end: Position::new(end.line, end.col),
        },
        new_text: formatted.render(&opts),
    }])
}
