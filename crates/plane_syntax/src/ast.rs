//! The tree node model shared by the parser and formatter.
//!
//! A node is either a leaf wrapping one token (`Item`, or `Identifier` for a
//! token promoted to an identifier) or a list wrapping an ordered child
//! sequence. The child sequence is the source of truth: a list renders as
//! the concatenation of its children, and the typed projections carried by
//! some list kinds are indices into that same sequence.

use crate::dialect::{self, KeywordKind};
use crate::token::{Pos, Token, TokenKind};

/// Identity tag of a list node, with the typed projections of the richer
/// variants. Projection values index into the node's own child sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKind {
    /// Top-level tree; children are statements and inter-statement leaves.
    Query,
    /// One statement, terminated by a semicolon or the end of the query.
    Statement,
    /// A plain child sequence with no further meaning.
    TokenList,
    /// Balanced paren pair with the inner children between them.
    Parenthesis,
    /// Function-name word directly followed by its argument parenthesis.
    FunctionLiteral,
    /// `CASE .. END` span.
    SwitchCase,
    /// `parent . child`; either side may be absent in a partial parse.
    MemberIdentifier {
        parent: Option<usize>,
        child: Option<usize>,
    },
    /// Fused keyword chain such as `ORDER BY` or `LEFT OUTER JOIN`.
    MultiKeyword { keywords: Vec<usize> },
    /// `left op right`; `right` is absent in a partial parse.
    Operator {
        left: usize,
        operator: usize,
        right: Option<usize>,
    },
    /// `left cmp right`; `right` is absent in a partial parse.
    Comparison {
        left: usize,
        comparison: usize,
        right: Option<usize>,
    },
    /// `real AS alias` (or `real alias` when no `AS` was written).
    Aliased {
        real_name: usize,
        as_token: Option<usize>,
        aliased_name: usize,
    },
    /// Comma-separated identifier-like elements.
    IdentifierList { items: Vec<usize> },
    /// Formatter output whose children splice into the enclosing list.
    Formatted,
    /// Formatter-built indentation run.
    Indent,
    /// Formatter-built line break.
    LineBreak,
}

/// Variant tag used by matchers; covers leaves as well as lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Item,
    Identifier,
    Query,
    Statement,
    TokenList,
    Parenthesis,
    FunctionLiteral,
    SwitchCase,
    MemberIdentifier,
    MultiKeyword,
    Operator,
    Comparison,
    Aliased,
    IdentifierList,
    Formatted,
    Indent,
    LineBreak,
}

/// A non-leaf node: an identity tag plus the ordered child sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenList {
    pub kind: ListKind,
    pub children: Vec<Node>,
}

impl TokenList {
    pub fn new(kind: ListKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            ListKind::Query => NodeType::Query,
            ListKind::Statement => NodeType::Statement,
            ListKind::TokenList => NodeType::TokenList,
            ListKind::Parenthesis => NodeType::Parenthesis,
            ListKind::FunctionLiteral => NodeType::FunctionLiteral,
            ListKind::SwitchCase => NodeType::SwitchCase,
            ListKind::MemberIdentifier { .. } => NodeType::MemberIdentifier,
            ListKind::MultiKeyword { .. } => NodeType::MultiKeyword,
            ListKind::Operator { .. } => NodeType::Operator,
            ListKind::Comparison { .. } => NodeType::Comparison,
            ListKind::Aliased { .. } => NodeType::Aliased,
            ListKind::IdentifierList { .. } => NodeType::IdentifierList,
            ListKind::Formatted => NodeType::Formatted,
            ListKind::Indent => NodeType::Indent,
            ListKind::LineBreak => NodeType::LineBreak,
        }
    }
}

/// A tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A leaf holding exactly one token.
    Item(Token),
    /// A single token promoted to an identifier.
    Identifier(Token),
    /// A list of child nodes.
    List(TokenList),
}

impl Node {
    pub fn list(kind: ListKind, children: Vec<Node>) -> Node {
        Node::List(TokenList::new(kind, children))
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Item(_) => NodeType::Item,
            Node::Identifier(_) => NodeType::Identifier,
            Node::List(list) => list.node_type(),
        }
    }

    /// The underlying token of a single-token node.
    pub fn token(&self) -> Option<&Token> {
        match self {
            Node::Item(tok) | Node::Identifier(tok) => Some(tok),
            Node::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&TokenList> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    /// True for a leaf holding a whitespace token.
    pub fn is_whitespace(&self) -> bool {
        self.token().map_or(false, Token::is_whitespace)
    }

    /// The first token in document order, depth first.
    pub fn first_token(&self) -> Option<&Token> {
        match self {
            Node::Item(tok) | Node::Identifier(tok) => Some(tok),
            Node::List(list) => list.children.iter().find_map(Node::first_token),
        }
    }

    /// The last token in document order, depth first.
    pub fn last_token(&self) -> Option<&Token> {
        match self {
            Node::Item(tok) | Node::Identifier(tok) => Some(tok),
            Node::List(list) => list.children.iter().rev().find_map(Node::last_token),
        }
    }

    /// Start position of the first token, if the tree has one.
    pub fn pos(&self) -> Option<Pos> {
        self.first_token().map(|tok| tok.pos)
    }

    /// End position of the last token, if the tree has one.
    pub fn end(&self) -> Option<Pos> {
        self.last_token().map(|tok| tok.end)
    }

    /// Renders the tree back to text. Lists render as the concatenation of
    /// their children.
    pub fn render(&self, opts: &RenderOptions) -> String {
        let mut out = String::new();
        self.write_to(&mut out, opts);
        out
    }

    fn write_to(&self, out: &mut String, opts: &RenderOptions) {
        match self {
            Node::Item(tok) | Node::Identifier(tok) => {
                if opts.lowercase_keywords
                    && tok.kind == TokenKind::Word
                    && dialect::keyword_kind(&tok.text) == Some(KeywordKind::Matched)
                {
                    out.push_str(&tok.text.to_ascii_lowercase());
                } else {
                    out.push_str(&tok.text);
                }
            }
            Node::List(list) => {
                for child in &list.children {
                    child.write_to(out, opts);
                }
            }
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(&RenderOptions::default()))
    }
}

/// Options honored when rendering a tree back to text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Emit reserved words in lowercase.
    pub lowercase_keywords: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Node {
        Node::Item(Token::detached(TokenKind::Word, text))
    }

    fn ws() -> Node {
        Node::Item(Token::detached(TokenKind::Whitespace, " "))
    }

    #[test]
    fn test_list_renders_as_child_concatenation() {
        let list = Node::list(
            ListKind::Statement,
            vec![word("SELECT"), ws(), word("a")],
        );
        let opts = RenderOptions::default();
        let concatenated: String = list
            .as_list()
            .unwrap()
            .children
            .iter()
            .map(|c| c.render(&opts))
            .collect();
        assert_eq!(list.render(&opts), concatenated);
        assert_eq!(list.render(&opts), "SELECT a");
    }

    #[test]
    fn test_lowercase_keywords_render() {
        let list = Node::list(
            ListKind::Statement,
            vec![word("SELECT"), ws(), word("MyColumn")],
        );
        let opts = RenderOptions {
            lowercase_keywords: true,
        };
        // Reserved words lowercase; plain identifiers keep their case.
        assert_eq!(list.render(&opts), "select MyColumn");
    }

    #[test]
    fn test_first_and_last_token() {
        let inner = Node::list(ListKind::TokenList, vec![word("a"), ws(), word("b")]);
        let outer = Node::list(ListKind::Statement, vec![inner, ws(), word("c")]);
        assert_eq!(outer.first_token().unwrap().text, "a");
        assert_eq!(outer.last_token().unwrap().text, "c");
    }

    #[test]
    fn test_pos_spans_the_tree() {
        let a = Node::Item(Token::new(
            TokenKind::Word,
            "a",
            Pos::new(0, 0),
            Pos::new(0, 1),
        ));
        let b = Node::Item(Token::new(
            TokenKind::Word,
            "b",
            Pos::new(1, 2),
            Pos::new(1, 3),
        ));
        let list = Node::list(ListKind::Query, vec![a, b]);
        assert_eq!(list.pos(), Some(Pos::new(0, 0)));
        assert_eq!(list.end(), Some(Pos::new(1, 3)));
    }

    #[test]
    fn test_identifier_exposes_token() {
        let ident = Node::Identifier(Token::detached(TokenKind::Word, "users"));
        assert_eq!(ident.token().unwrap().text, "users");
        assert_eq!(ident.node_type(), NodeType::Identifier);
        assert!(!ident.is_list());
    }
}
