//! Pass-based SQL parser.
//!
//! The parser seeds a flat [`Node`] tree from the token stream and then
//! runs a fixed sequence of rewrite passes over it, each fusing adjacent
//! children into richer list variants (statements, parentheses, functions,
//! case blocks, member identifiers, keyword chains, operators, comparisons,
//! aliases, identifier lists). Imperfect input never fails a pass: unmatched
//! delimiters and missing operands parse to partial nodes so that mid-edit
//! documents still produce a tree.
//!
//! # Usage
//!
//! ```
//! let tree = plane_parser::parse("SELECT a FROM t").unwrap();
//! assert_eq!(tree.to_string(), "SELECT a FROM t");
//! ```

mod passes;

use plane_lexer::TokenizeError;
use plane_syntax::{ListKind, Node, Pos, TokenKind};

/// Parse failure, carrying the position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub pos: Pos,
}

impl ParseError {
    pub fn new(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            message: message.into(),
            pos,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parse error at {}:{}: {}",
            self.pos.line, self.pos.col, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<TokenizeError> for ParseError {
    fn from(err: TokenizeError) -> Self {
        ParseError::new(err.message, err.pos)
    }
}

/// Tokenizes and parses `text` into a query tree.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    let parser = Parser::new(text)?;
    parser.parse()
}

/// A seeded parse, ready to run the pass pipeline.
pub struct Parser {
    root: Node,
}

impl Parser {
    /// Tokenizes `text` and seeds the tree with one leaf per token.
    /// Comment tokens are dropped here and never reach the tree.
    pub fn new(text: &str) -> Result<Self, TokenizeError> {
        let tokens = plane_lexer::tokenize(text)?;
        let children = tokens
            .into_iter()
            .filter(|tok| tok.kind != TokenKind::Comment)
            .map(Node::Item)
            .collect();
        Ok(Self {
            root: Node::list(ListKind::Query, children),
        })
    }

    /// Runs the rewrite passes. Partial input parses to partial nodes
    /// rather than failing, so this only errs on malformed trees that a
    /// future pass refuses outright.
    pub fn parse(self) -> Result<Node, ParseError> {
        Ok(passes::run(self.root))
    }
}
