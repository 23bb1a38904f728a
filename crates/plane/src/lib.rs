//! Plane: SQL document formatter for editor integration.
//!
//! A two-stage pipeline: a pass-based parser builds a whitespace-preserving
//! tree, and a tree-directed rewrite lays it out with line breaks and
//! indentation, returning a language-server shaped text edit.

pub use plane_syntax::{Node, Pos, RenderOptions, Token, TokenKind};

pub mod lexer {
    pub use plane_lexer::{tokenize, TokenizeError};
}

pub mod parser {
    pub use plane_parser::{parse, ParseError, Parser};
}

pub mod format {
    pub use plane_format::{
        format, DocumentFormattingParams, FormatConfig, FormatError, FormattingOptions, Position,
        Range, TextEdit,
    };
}
