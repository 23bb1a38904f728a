//! Formatter-built leaves.
//!
//! Each function returns a fresh immutable value; decoration nodes are
//! never shared mutably between positions in the tree.

use plane_syntax::{ListKind, Node, Token, TokenKind};

pub(crate) fn whitespace_node() -> Node {
    Node::Item(Token::detached(TokenKind::Whitespace, " "))
}

pub(crate) fn whitespace_nodes(count: usize) -> Vec<Node> {
    (0..count).map(|_| whitespace_node()).collect()
}

pub(crate) fn linebreak_node() -> Node {
    Node::list(
        ListKind::LineBreak,
        vec![Node::Item(Token::detached(TokenKind::Whitespace, "\n"))],
    )
}

pub(crate) fn tab_item() -> Node {
    Node::Item(Token::detached(TokenKind::Whitespace, "\t"))
}

pub(crate) fn period_item() -> Node {
    Node::Item(Token::detached(TokenKind::Period, "."))
}

pub(crate) fn lparen_item() -> Node {
    Node::Item(Token::detached(TokenKind::LParen, "("))
}

pub(crate) fn rparen_item() -> Node {
    Node::Item(Token::detached(TokenKind::RParen, ")"))
}

pub(crate) fn comma_item() -> Node {
    Node::Item(Token::detached(TokenKind::Comma, ","))
}
