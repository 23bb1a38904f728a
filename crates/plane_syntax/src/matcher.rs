//! Declarative node predicates used by the parse passes and the formatter.

use crate::ast::{Node, NodeType};
use crate::dialect::{self, KeywordKind};
use crate::token::TokenKind;

/// A disjunction of acceptance conditions. A node matches when any
/// non-empty condition accepts it: its variant tag is listed, its token
/// kind is listed, its text equals a listed keyword (ASCII
/// case-insensitive), or its dialect classification is listed. The token
/// conditions only apply to single-token nodes.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    pub node_types: &'static [NodeType],
    pub expect_tokens: &'static [TokenKind],
    pub expect_keyword: &'static [&'static str],
    pub expect_sql_type: &'static [KeywordKind],
}

impl Matcher {
    pub const EMPTY: Matcher = Matcher {
        node_types: &[],
        expect_tokens: &[],
        expect_keyword: &[],
        expect_sql_type: &[],
    };

    pub const fn node_types(node_types: &'static [NodeType]) -> Matcher {
        Matcher {
            node_types,
            expect_tokens: &[],
            expect_keyword: &[],
            expect_sql_type: &[],
        }
    }

    pub const fn tokens(expect_tokens: &'static [TokenKind]) -> Matcher {
        Matcher {
            node_types: &[],
            expect_tokens,
            expect_keyword: &[],
            expect_sql_type: &[],
        }
    }

    pub const fn keywords(expect_keyword: &'static [&'static str]) -> Matcher {
        Matcher {
            node_types: &[],
            expect_tokens: &[],
            expect_keyword,
            expect_sql_type: &[],
        }
    }

    pub fn is_match(&self, node: &Node) -> bool {
        if self.node_types.contains(&node.node_type()) {
            return true;
        }
        let Some(tok) = node.token() else {
            return false;
        };
        if self.expect_tokens.contains(&tok.kind) {
            return true;
        }
        if tok.kind == TokenKind::Word {
            if self
                .expect_keyword
                .iter()
                .any(|kw| tok.text.eq_ignore_ascii_case(kw))
            {
                return true;
            }
            if !self.expect_sql_type.is_empty() {
                if let Some(kind) = dialect::keyword_kind(&tok.text) {
                    if self.expect_sql_type.contains(&kind) {
                        return true;
                    }
                }
            }
        }
        false
    }
}
