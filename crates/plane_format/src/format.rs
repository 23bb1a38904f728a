//! The tree-directed formatting rewrite.
//!
//! [`eval`] walks the parsed tree and rebuilds each node with decoration
//! leaves (whitespace, line breaks, indents) spliced in. Keyword-context
//! matchers drive a live indent counter on the environment; the counter
//! never goes below zero.

use crate::lsp::FormattingOptions;
use crate::nodes::{
    comma_item, linebreak_node, lparen_item, period_item, rparen_item, tab_item, whitespace_node,
    whitespace_nodes,
};
use plane_syntax::{ListKind, Matcher, Node, NodeReader, NodeType, TokenKind, TokenList};

/// Mutable state threaded through one formatting walk.
#[derive(Debug)]
pub struct FormatEnvironment {
    indent_level: usize,
    unit_indent: Node,
}

impl FormatEnvironment {
    pub fn new(options: FormattingOptions) -> Self {
        let unit = if options.insert_spaces {
            whitespace_nodes(options.tab_size as usize)
        } else {
            vec![tab_item()]
        };
        Self {
            indent_level: 0,
            unit_indent: Node::list(ListKind::Indent, unit),
        }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    fn indent_up(&mut self) {
        self.indent_level += 1;
    }

    fn indent_down(&mut self) {
        if self.indent_level == 0 {
            log::warn!("indent level underflow, clamping to zero");
            return;
        }
        self.indent_level -= 1;
    }

    /// The current indentation: `indent_level` copies of the unit indent.
    fn indent(&self) -> Node {
        Node::list(
            ListKind::Indent,
            vec![self.unit_indent.clone(); self.indent_level],
        )
    }
}

/// Formats one node, rebuilding it with decoration leaves spliced in.
pub fn eval(node: Node, env: &mut FormatEnvironment) -> Node {
    match node {
        Node::Item(_) => format_item(node, env),
        Node::Identifier(_) => node,
        Node::List(list) => match list.node_type() {
            NodeType::MultiKeyword => format_multi_keyword(list, env),
            NodeType::Aliased => format_aliased(list, env),
            NodeType::MemberIdentifier => format_member_identifier(list, env),
            NodeType::Operator | NodeType::Comparison => format_binary(list, env),
            NodeType::Parenthesis => format_parenthesis(list, env),
            NodeType::FunctionLiteral => Node::List(list),
            NodeType::IdentifierList => format_identifier_list(list, env, false),
            _ => format_token_list(list, env),
        },
    }
}

const OUTDENT_BEFORE: Matcher = Matcher::keywords(&[
    "FROM", "INTO", "VALUES", "JOIN", "WHERE", "HAVING", "LIMIT", "UNION", "SET", "EXCEPT", "END",
]);
const INDENT_BEFORE: Matcher = Matcher::keywords(&["ON"]);
const LINEBREAK_BEFORE: Matcher = Matcher::keywords(&["AND", "OR", "WHEN", "ELSE"]);
const LINEBREAK_INDENT_AFTER: Matcher = Matcher {
    node_types: &[],
    expect_tokens: &[TokenKind::LParen],
    expect_keyword: &[
        "SELECT", "INSERT", "FROM", "VALUES", "INTO", "SET", "WHERE", "HAVING",
    ],
    expect_sql_type: &[],
};
const INDENT_AFTER: Matcher = Matcher::keywords(&["CASE"]);
const LINEBREAK_AFTER: Matcher = Matcher::tokens(&[TokenKind::Comma]);

/// Decorates a leaf according to the keyword-context rules. The result is
/// a `Formatted` list whose children splice into the enclosing walk.
fn format_item(node: Node, env: &mut FormatEnvironment) -> Node {
    let outdent_before = OUTDENT_BEFORE.is_match(&node);
    let indent_before = INDENT_BEFORE.is_match(&node);
    let linebreak_before = LINEBREAK_BEFORE.is_match(&node);
    let linebreak_indent_after = LINEBREAK_INDENT_AFTER.is_match(&node);
    let indent_after = INDENT_AFTER.is_match(&node);
    let linebreak_after = LINEBREAK_AFTER.is_match(&node);

    let mut results = vec![node];

    if outdent_before {
        env.indent_down();
        results.insert(0, env.indent());
        results.insert(0, linebreak_node());
    }
    if indent_before {
        env.indent_up();
        results.insert(0, env.indent());
        results.insert(0, linebreak_node());
    }
    if linebreak_before {
        results.insert(0, env.indent());
        results.insert(0, linebreak_node());
    }

    if linebreak_indent_after {
        results.push(linebreak_node());
        env.indent_up();
        results.push(env.indent());
    }
    if indent_after {
        env.indent_up();
    }
    if linebreak_after {
        results.push(linebreak_node());
        results.push(env.indent());
    }

    Node::list(ListKind::Formatted, results)
}

/// Joins a fused keyword chain with single spaces and applies the
/// join/by-family line-break rules.
fn format_multi_keyword(list: TokenList, env: &mut FormatEnvironment) -> Node {
    let keywords = match &list.kind {
        ListKind::MultiKeyword { keywords } => keywords.clone(),
        _ => return Node::List(list),
    };
    let keyword_nodes = take_indexed(list.children, &keywords);
    let roster = keyword_nodes
        .iter()
        .filter_map(Node::token)
        .map(|tok| tok.text.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(" ");

    let count = keyword_nodes.len();
    let mut results = Vec::new();
    for (i, keyword) in keyword_nodes.into_iter().enumerate() {
        results.push(keyword);
        if i != count - 1 {
            results.push(whitespace_node());
        }
    }

    let join_family = roster.ends_with(" JOIN");
    let by_family = matches!(roster.as_str(), "GROUP BY" | "ORDER BY");
    let insert_family = roster == "INSERT INTO";

    if join_family || insert_family {
        results.push(whitespace_node());
    }
    if join_family || by_family {
        env.indent_down();
        results.insert(0, env.indent());
        results.insert(0, linebreak_node());
    }
    if by_family {
        results.push(linebreak_node());
        env.indent_up();
        results.push(env.indent());
    }

    Node::list(ListKind::Formatted, results)
}

/// `real AS alias` with single spaces, or `real alias` without `AS`.
fn format_aliased(list: TokenList, env: &mut FormatEnvironment) -> Node {
    let (real_name, as_token, aliased_name) = match &list.kind {
        ListKind::Aliased {
            real_name,
            as_token,
            aliased_name,
        } => (*real_name, *as_token, *aliased_name),
        _ => return Node::List(list),
    };
    let [real, as_kw, alias] =
        take_projected(list.children, [Some(real_name), as_token, Some(aliased_name)]);

    let mut results = Vec::new();
    if let Some(real) = real {
        results.push(eval(real, env));
    }
    let mut as_index = None;
    if let Some(as_kw) = as_kw {
        results.push(whitespace_node());
        as_index = Some(results.len());
        results.push(as_kw);
    }
    let mut alias_index = 0;
    if let Some(alias) = alias {
        results.push(whitespace_node());
        alias_index = results.len();
        results.push(eval(alias, env));
    }

    Node::list(
        ListKind::Aliased {
            real_name: 0,
            as_token: as_index,
            aliased_name: alias_index,
        },
        results,
    )
}

/// `parent.child` with no surrounding whitespace.
fn format_member_identifier(list: TokenList, env: &mut FormatEnvironment) -> Node {
    let (parent, child) = match &list.kind {
        ListKind::MemberIdentifier { parent, child } => (*parent, *child),
        _ => return Node::List(list),
    };
    let [parent, child, _] = take_projected(list.children, [parent, child, None]);

    let mut results = Vec::new();
    let parent_index = parent.map(|p| {
        results.push(eval(p, env));
        0
    });
    results.push(period_item());
    let child_index = child.map(|c| {
        results.push(eval(c, env));
        results.len() - 1
    });

    Node::list(
        ListKind::MemberIdentifier {
            parent: parent_index,
            child: child_index,
        },
        results,
    )
}

/// `left op right` with single spaces; a partial node keeps its trailing
/// space so the cleanup pass can decide.
fn format_binary(list: TokenList, env: &mut FormatEnvironment) -> Node {
    let (left_at, op_at, right_at, comparison) = match &list.kind {
        ListKind::Operator {
            left,
            operator,
            right,
        } => (*left, *operator, *right, false),
        ListKind::Comparison {
            left,
            comparison,
            right,
        } => (*left, *comparison, *right, true),
        _ => return Node::List(list),
    };
    let [left, op, right] = take_projected(list.children, [Some(left_at), Some(op_at), right_at]);

    let mut results = Vec::new();
    if let Some(left) = left {
        results.push(eval(left, env));
    }
    results.push(whitespace_node());
    let op_index = results.len();
    if let Some(op) = op {
        results.push(op);
    }
    results.push(whitespace_node());
    let right_index = right.map(|r| {
        let index = results.len();
        results.push(eval(r, env));
        index
    });

    let kind = if comparison {
        ListKind::Comparison {
            left: 0,
            comparison: op_index,
            right: right_index,
        }
    } else {
        ListKind::Operator {
            left: 0,
            operator: op_index,
            right: right_index,
        }
    };
    Node::list(kind, results)
}

const SELECT_KEYWORD: Matcher = Matcher::keywords(&["SELECT"]);

/// Parenthesis layout: subqueries break onto their own indented lines and
/// restore the entry indent for the closing paren; identifier lists lay
/// out inline; anything else formats in place between the parens.
fn format_parenthesis(list: TokenList, env: &mut FormatEnvironment) -> Node {
    let len = list.children.len();
    if len < 2 {
        return Node::List(list);
    }
    let inner: Vec<Node> = list.children[1..len - 1].to_vec();
    let entry_level = env.indent_level;
    let mut results = vec![lparen_item()];

    let subquery = inner
        .iter()
        .find(|node| !node.is_whitespace())
        .map_or(false, |node| SELECT_KEYWORD.is_match(node));
    if subquery {
        env.indent_up();
        results.push(linebreak_node());
        results.push(env.indent());
        results.push(eval(Node::list(ListKind::TokenList, inner), env));
        // Inner formatting moves the counter freely; the closing paren
        // must align with the opener.
        env.indent_level = entry_level;
        results.push(linebreak_node());
        results.push(env.indent());
        results.push(rparen_item());
        return Node::list(ListKind::Parenthesis, results);
    }

    let inline_list = matches!(
        inner.first(),
        Some(Node::List(first)) if matches!(first.kind, ListKind::IdentifierList { .. })
    );
    if inline_list {
        if let Some(Node::List(idents)) = inner.into_iter().next() {
            results.push(format_identifier_list(idents, env, true));
        }
    } else {
        results.push(eval(Node::list(ListKind::TokenList, inner), env));
    }
    results.push(rparen_item());
    Node::list(ListKind::Parenthesis, results)
}

/// Elements joined by commas: line-broken at the current indent, or with
/// single spaces in inline mode.
fn format_identifier_list(list: TokenList, env: &mut FormatEnvironment, inline: bool) -> Node {
    let items = match &list.kind {
        ListKind::IdentifierList { items } => items.clone(),
        _ => return Node::List(list),
    };
    let idents = take_indexed(list.children, &items);

    let count = idents.len();
    let mut results = Vec::new();
    let mut item_indices = Vec::new();
    for (i, ident) in idents.into_iter().enumerate() {
        item_indices.push(results.len());
        results.push(eval(ident, env));
        if i != count - 1 {
            results.push(comma_item());
            if inline {
                results.push(whitespace_node());
            } else {
                results.push(linebreak_node());
                results.push(env.indent());
            }
        }
    }

    Node::list(
        ListKind::IdentifierList {
            items: item_indices,
        },
        results,
    )
}

/// The generic fallthrough: formats each child and splices `Formatted`
/// results into the rebuilt sequence.
fn format_token_list(list: TokenList, env: &mut FormatEnvironment) -> Node {
    let TokenList { kind, children } = list;
    let mut reader = NodeReader::new(children);
    let mut results = Vec::new();
    while reader.next_node(false) {
        let Some(cur) = reader.cur_node().cloned() else {
            break;
        };
        match eval(cur, env) {
            Node::List(evaluated) if evaluated.kind == ListKind::Formatted => {
                results.extend(evaluated.children);
            }
            other => results.push(other),
        }
    }
    Node::list(kind, results)
}

/// Moves the projected children out of a sequence, by index.
fn take_projected(children: Vec<Node>, indices: [Option<usize>; 3]) -> [Option<Node>; 3] {
    let mut out = [None, None, None];
    for (i, node) in children.into_iter().enumerate() {
        if let Some(slot) = indices.iter().position(|idx| *idx == Some(i)) {
            out[slot] = Some(node);
        }
    }
    out
}

/// Moves an indexed selection out of a sequence, preserving index order.
fn take_indexed(children: Vec<Node>, indices: &[usize]) -> Vec<Node> {
    let mut slots: Vec<Option<Node>> = children.into_iter().map(Some).collect();
    indices
        .iter()
        .filter_map(|&i| slots.get_mut(i).and_then(Option::take))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plane_syntax::Token;

    fn env() -> FormatEnvironment {
        FormatEnvironment::new(FormattingOptions {
            tab_size: 2,
            insert_spaces: true,
        })
    }

    #[test]
    fn test_indent_renders_per_level() {
        let mut e = env();
        e.indent_up();
        assert_eq!(e.indent().to_string(), "  ");
        e.indent_up();
        assert_eq!(e.indent().to_string(), "    ");
    }

    #[test]
    fn test_indent_underflow_clamps_to_zero() {
        let mut e = env();
        e.indent_down();
        assert_eq!(e.indent_level(), 0);
        assert_eq!(e.indent().to_string(), "");
    }

    #[test]
    fn test_tab_indent() {
        let mut e = FormatEnvironment::new(FormattingOptions {
            tab_size: 4,
            insert_spaces: false,
        });
        e.indent_up();
        assert_eq!(e.indent().to_string(), "\t");
    }

    #[test]
    fn test_subquery_parenthesis_restores_indent() {
        let tree = plane_parser::parse("SELECT * FROM (SELECT a FROM t)").unwrap();
        let mut e = env();
        eval(tree, &mut e);
        // FROM leaves the counter at one; the paren itself must not leak
        // the inner statement's increments past its exit reset.
        assert_eq!(e.indent_level(), 1);
    }

    #[test]
    fn test_comma_item_breaks_line() {
        let mut e = env();
        let comma = Node::Item(Token::detached(TokenKind::Comma, ","));
        let formatted = format_item(comma, &mut e);
        assert_eq!(formatted.to_string(), ",\n");
    }

    #[test]
    fn test_case_keyword_indents_without_break() {
        let mut e = env();
        let case = Node::Item(Token::detached(TokenKind::Word, "CASE"));
        let formatted = format_item(case, &mut e);
        assert_eq!(formatted.to_string(), "CASE");
        assert_eq!(e.indent_level(), 1);
    }
}
