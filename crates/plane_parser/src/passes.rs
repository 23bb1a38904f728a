//! The rewrite passes and their drivers.
//!
//! Each pass walks every list in the tree through a generic driver and
//! fuses runs of adjacent children into a richer node. The prefix driver
//! fires when the current child matches; the infix driver fires when the
//! next child matches, so the callback can consume `left op right` runs.
//! Pass order is load-bearing: later passes rely on the structure built by
//! earlier ones.

use plane_syntax::{
    KeywordKind, ListKind, Matcher, Node, NodeReader, NodeType, TokenKind, TokenList,
};

type ParseFn = fn(Node, &mut NodeReader) -> Node;

/// Runs the full pass pipeline over the seeded query tree.
pub(crate) fn run(root: Node) -> Node {
    let root = parse_statements(root);

    let root = parse_prefix_group(root, &PARENTHESIS_OPEN, parse_parenthesis);
    let root = parse_prefix_group(root, &FUNCTION_NAME, parse_function);
    let root = parse_prefix_group(root, &IDENTIFIER_TARGET, parse_identifier);
    let root = parse_prefix_group(root, &SWITCH_CASE_OPEN, parse_case);

    let root = parse_prefix_group(root, &PARENTHESIS_NODE, parse_operator_in_parenthesis);
    let root = parse_prefix_group(root, &PARENTHESIS_NODE, parse_comparison_in_parenthesis);

    let root = parse_infix_group(root, &MEMBER_PERIOD, false, parse_member_identifier);
    let root = parse_prefix_group(root, &MULTI_KEYWORD_START, parse_multi_keyword);
    let root = parse_infix_group(root, &OPERATOR_INFIX, true, parse_operator);
    let root = parse_infix_group(root, &COMPARISON_INFIX, true, parse_comparison);
    let root = parse_prefix_group(root, &ALIAS_LEFT, parse_aliased_without_as);
    let root = parse_infix_group(root, &ALIAS_AS, true, parse_aliased);
    parse_infix_group(root, &IDENTIFIER_LIST_COMMA, true, parse_identifier_list)
}

/// Rebuilds `node`'s children, replacing each child the matcher accepts
/// with `f`'s result and recursing into other lists.
fn parse_prefix_group(node: Node, matcher: &Matcher, f: ParseFn) -> Node {
    let Node::List(list) = node else { return node };
    let TokenList { kind, children } = list;
    let mut reader = NodeReader::new(children);
    let mut replaced = Vec::new();
    while reader.next_node(false) {
        let Some(cur) = reader.cur_node().cloned() else {
            break;
        };
        if reader.cur_node_is(matcher) {
            replaced.push(f(cur, &mut reader));
        } else if cur.is_list() {
            replaced.push(parse_prefix_group(cur, matcher, f));
        } else {
            replaced.push(cur);
        }
    }
    Node::list(kind, replaced)
}

/// Like [`parse_prefix_group`], but fires when the peeked next child
/// matches, handing `f` the left operand as the current node.
fn parse_infix_group(node: Node, matcher: &Matcher, ignore_whitespace: bool, f: ParseFn) -> Node {
    let Node::List(list) = node else { return node };
    let TokenList { kind, children } = list;
    let mut reader = NodeReader::new(children);
    let mut replaced = Vec::new();
    while reader.next_node(false) {
        let Some(cur) = reader.cur_node().cloned() else {
            break;
        };
        if reader.peek_node_is(ignore_whitespace, matcher) {
            replaced.push(f(cur, &mut reader));
        } else if cur.is_list() {
            replaced.push(parse_infix_group(cur, matcher, ignore_whitespace, f));
        } else {
            replaced.push(cur);
        }
    }
    Node::list(kind, replaced)
}

const SEMICOLON: Matcher = Matcher::tokens(&[TokenKind::Semicolon]);

/// Splits a list on semicolons into `Statement` nodes. Trailing content
/// with no terminator becomes a final statement.
fn parse_statements(node: Node) -> Node {
    let Node::List(list) = node else { return node };
    let TokenList { kind, children } = list;
    let mut reader = NodeReader::new(children);
    let mut replaced = Vec::new();
    let mut start_index = 0;
    while reader.next_node(false) {
        if let Some(cur) = reader.cur_node() {
            if cur.is_list() {
                let cur = cur.clone();
                replaced.push(parse_statements(cur));
                continue;
            }
        }
        if let Some(found) = reader.find_node(true, &SEMICOLON) {
            replaced.push(Node::list(
                ListKind::Statement,
                reader.nodes_with_range(start_index, found.index),
            ));
            start_index = found.index;
            reader.sync_to(&found);
        }
    }
    if reader.index != start_index {
        replaced.push(Node::list(
            ListKind::Statement,
            reader.nodes_with_range(start_index, reader.index),
        ));
    }
    Node::list(kind, replaced)
}

const PARENTHESIS_OPEN: Matcher = Matcher::tokens(&[TokenKind::LParen]);
const PARENTHESIS_CLOSE: Matcher = Matcher::tokens(&[TokenKind::RParen]);

/// Scans from a left paren to its matching right paren, recursing for
/// nested pairs. With no matching paren in sight the bare left-paren leaf
/// is kept and nothing is consumed.
fn parse_parenthesis(cur: Node, reader: &mut NodeReader) -> Node {
    let mut nodes = vec![cur.clone()];
    let mut tmp = reader.copy_reader();
    while tmp.next_node(false) {
        if tmp.cur_node_is(&PARENTHESIS_OPEN) {
            let Some(open) = tmp.cur_node().cloned() else {
                break;
            };
            nodes.push(parse_parenthesis(open, &mut tmp));
        } else if tmp.cur_node_is(&PARENTHESIS_CLOSE) {
            if let Some(close) = tmp.cur_node().cloned() {
                nodes.push(close);
            }
            reader.sync_to(&tmp);
            return Node::list(ListKind::Parenthesis, nodes);
        } else if let Some(node) = tmp.cur_node() {
            nodes.push(node.clone());
        }
    }
    cur
}

const FUNCTION_NAME: Matcher = Matcher {
    node_types: &[],
    expect_tokens: &[],
    expect_keyword: &[],
    expect_sql_type: &[KeywordKind::Matched, KeywordKind::Unmatched],
};
const FUNCTION_ARGS: Matcher = Matcher::node_types(&[NodeType::Parenthesis]);

/// Fuses a word directly followed by a parenthesis into a function
/// literal. Whitespace between the two keeps them separate.
fn parse_function(cur: Node, reader: &mut NodeReader) -> Node {
    if reader.peek_node_is(false, &FUNCTION_ARGS) {
        let (_, args) = reader.peek_node(false);
        if let Some(args) = args.cloned() {
            reader.next_node(false);
            return Node::list(ListKind::FunctionLiteral, vec![cur, args]);
        }
    }
    cur
}

const IDENTIFIER_TARGET: Matcher = Matcher {
    node_types: &[],
    expect_tokens: &[TokenKind::Mult],
    expect_keyword: &[],
    expect_sql_type: &[KeywordKind::Unmatched],
};

/// Promotes a bare `*` or non-reserved word to an identifier node.
fn parse_identifier(cur: Node, _reader: &mut NodeReader) -> Node {
    match cur {
        Node::Item(tok) => Node::Identifier(tok),
        other => other,
    }
}

const SWITCH_CASE_OPEN: Matcher = Matcher::keywords(&["CASE"]);
const SWITCH_CASE_CLOSE: Matcher = Matcher::keywords(&["END"]);

/// Wraps `CASE .. END` as a switch-case span. With no `END` at this level
/// the bare `CASE` leaf is kept and nothing is consumed.
fn parse_case(cur: Node, reader: &mut NodeReader) -> Node {
    let mut nodes = vec![cur.clone()];
    let mut tmp = reader.copy_reader();
    while tmp.next_node(false) {
        if tmp.cur_node_is(&SWITCH_CASE_CLOSE) {
            if let Some(end) = tmp.cur_node().cloned() {
                nodes.push(end);
            }
            reader.sync_to(&tmp);
            return Node::list(ListKind::SwitchCase, nodes);
        }
        if let Some(node) = tmp.cur_node() {
            nodes.push(node.clone());
        }
    }
    cur
}

const PARENTHESIS_NODE: Matcher = Matcher::node_types(&[NodeType::Parenthesis]);

/// Structures arithmetic inside a parenthesis before the top-level
/// operator pass runs.
fn parse_operator_in_parenthesis(cur: Node, _reader: &mut NodeReader) -> Node {
    if cur.is_list() {
        parse_infix_group(cur, &OPERATOR_INFIX, true, parse_operator)
    } else {
        cur
    }
}

/// Structures comparisons inside a parenthesis before the top-level
/// comparison pass runs.
fn parse_comparison_in_parenthesis(cur: Node, _reader: &mut NodeReader) -> Node {
    if cur.is_list() {
        parse_infix_group(cur, &COMPARISON_INFIX, true, parse_comparison)
    } else {
        cur
    }
}

const MEMBER_PERIOD: Matcher = Matcher::tokens(&[TokenKind::Period]);
const MEMBER_TARGET: Matcher = Matcher {
    node_types: &[],
    expect_tokens: &[TokenKind::Mult],
    expect_keyword: &[],
    expect_sql_type: &[KeywordKind::Unmatched],
};

/// Fuses `parent . child` into a member identifier. A trailing period
/// yields a partial node with no child.
fn parse_member_identifier(cur: Node, reader: &mut NodeReader) -> Node {
    if !MEMBER_TARGET.is_match(&cur) {
        return cur;
    }
    let Some(start) = reader.cur_index() else {
        return cur;
    };
    reader.next_node(false); // onto the period
    if !reader.peek_node_is(true, &MEMBER_TARGET) {
        return Node::list(
            ListKind::MemberIdentifier {
                parent: Some(0),
                child: None,
            },
            reader.nodes_with_range(start, start + 2),
        );
    }
    let (end, _) = reader.peek_node(true);
    reader.next_node(true); // onto the child
    Node::list(
        ListKind::MemberIdentifier {
            parent: Some(0),
            child: Some(end - start),
        },
        reader.nodes_with_range(start, end + 1),
    )
}

const MULTI_KEYWORD_START: Matcher = Matcher::keywords(&[
    "ORDER", "GROUP", "INSERT", "DELETE", "INNER", "CROSS", "OUTER", "LEFT", "RIGHT", "NATURAL",
]);

/// Permitted continuations per starting keyword, tried in order.
fn multi_keyword_follow(keyword: &str) -> Option<&'static [&'static str]> {
    match keyword {
        "ORDER" | "GROUP" => Some(&["BY"]),
        "INSERT" => Some(&["INTO"]),
        "DELETE" => Some(&["FROM"]),
        "INNER" | "CROSS" | "OUTER" => Some(&["JOIN"]),
        "LEFT" | "RIGHT" => Some(&["OUTER", "JOIN"]),
        "NATURAL" => Some(&["LEFT", "RIGHT", "OUTER", "JOIN"]),
        _ => None,
    }
}

/// Greedily consumes the longest keyword chain reachable from the current
/// keyword. A start with no continuation stays a bare leaf; a chain cut
/// short mid-way becomes a partial multi-keyword over what it consumed.
fn parse_multi_keyword(cur: Node, reader: &mut NodeReader) -> Node {
    let Some(start) = reader.cur_index() else {
        return cur;
    };
    let mut keyword_indices = vec![start];
    loop {
        let text = match reader.cur_node().and_then(Node::token) {
            Some(tok) => tok.text.to_ascii_uppercase(),
            None => break,
        };
        let Some(follow) = multi_keyword_follow(&text) else {
            break;
        };
        let follow_matcher = Matcher {
            expect_keyword: follow,
            ..Matcher::EMPTY
        };
        if !reader.peek_node_is(true, &follow_matcher) {
            if keyword_indices.len() == 1 {
                return cur;
            }
            break;
        }
        reader.next_node(true);
        if let Some(idx) = reader.cur_index() {
            keyword_indices.push(idx);
        }
    }
    let keywords = keyword_indices.iter().map(|i| i - start).collect();
    Node::list(
        ListKind::MultiKeyword { keywords },
        reader.nodes_with_range(start, reader.index),
    )
}

const OPERATOR_INFIX: Matcher = Matcher::tokens(&[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Mult,
    TokenKind::Div,
    TokenKind::Mod,
]);
const OPERATOR_TARGET: Matcher = Matcher {
    node_types: &[
        NodeType::Identifier,
        NodeType::MemberIdentifier,
        NodeType::Operator,
        NodeType::Parenthesis,
        NodeType::FunctionLiteral,
    ],
    expect_tokens: &[
        TokenKind::Number,
        TokenKind::Char,
        TokenKind::SingleQuotedString,
        TokenKind::NationalStringLiteral,
    ],
    expect_keyword: &[],
    expect_sql_type: &[],
};

fn parse_operator(cur: Node, reader: &mut NodeReader) -> Node {
    parse_binary(cur, reader, &OPERATOR_TARGET, false)
}

const COMPARISON_INFIX: Matcher = Matcher {
    node_types: &[],
    expect_tokens: &[
        TokenKind::Eq,
        TokenKind::Neq,
        TokenKind::Lt,
        TokenKind::Gt,
        TokenKind::LtEq,
        TokenKind::GtEq,
    ],
    expect_keyword: &["IS"],
    expect_sql_type: &[],
};
const COMPARISON_TARGET: Matcher = Matcher {
    node_types: &[
        NodeType::Parenthesis,
        NodeType::Identifier,
        NodeType::MemberIdentifier,
        NodeType::Operator,
        NodeType::FunctionLiteral,
    ],
    expect_tokens: &[
        TokenKind::Number,
        TokenKind::Char,
        TokenKind::SingleQuotedString,
        TokenKind::NationalStringLiteral,
    ],
    expect_keyword: &["TRUE", "FALSE"],
    expect_sql_type: &[],
};

fn parse_comparison(cur: Node, reader: &mut NodeReader) -> Node {
    parse_binary(cur, reader, &COMPARISON_TARGET, true)
}

/// Consumes `left op right` into an operator or comparison node. With no
/// acceptable right operand the node is partial: its range runs through
/// any trailing whitespace but stops before the next significant child.
fn parse_binary(cur: Node, reader: &mut NodeReader, target: &Matcher, comparison: bool) -> Node {
    if !target.is_match(&cur) {
        return cur;
    }
    let Some(start) = reader.cur_index() else {
        return cur;
    };
    if !reader.next_node(true) {
        return cur;
    }
    let op = reader.cur_index().map_or(0, |i| i - start);

    if !reader.peek_node_is(true, target) {
        let (peek_index, peek) = reader.peek_node(true);
        let end = if peek.is_some() {
            peek_index
        } else {
            reader.tail_node().0
        };
        if peek.is_some() {
            reader.jump(end);
        } else {
            reader.jump_to_end();
        }
        return Node::list(
            binary_kind(comparison, op, None),
            reader.nodes_with_range(start, end),
        );
    }

    let (right_index, _) = reader.peek_node(true);
    reader.next_node(true);
    Node::list(
        binary_kind(comparison, op, Some(right_index - start)),
        reader.nodes_with_range(start, right_index + 1),
    )
}

fn binary_kind(comparison: bool, op: usize, right: Option<usize>) -> ListKind {
    if comparison {
        ListKind::Comparison {
            left: 0,
            comparison: op,
            right,
        }
    } else {
        ListKind::Operator {
            left: 0,
            operator: op,
            right,
        }
    }
}

const ALIAS_AS: Matcher = Matcher::keywords(&["AS"]);
const ALIAS_LEFT: Matcher = Matcher::node_types(&[
    NodeType::Parenthesis,
    NodeType::FunctionLiteral,
    NodeType::Identifier,
    NodeType::MemberIdentifier,
    NodeType::SwitchCase,
    NodeType::Operator,
]);
const ALIAS_RIGHT: Matcher = Matcher::node_types(&[NodeType::Identifier]);
const ALIAS_RECURSION: Matcher = Matcher::node_types(&[NodeType::Parenthesis]);

/// Fuses `name alias` pairs written without `AS`. Parenthesized
/// subqueries are rewritten from the inside out first so an aliased inner
/// select is already structured when the outer pair fuses.
fn parse_aliased_without_as(cur: Node, reader: &mut NodeReader) -> Node {
    let mut cur = cur;
    if ALIAS_RECURSION.is_match(&cur) {
        cur = parse_prefix_group(cur, &ALIAS_LEFT, parse_aliased_without_as);
        if let Some(index) = reader.cur_index() {
            reader.replace(cur.clone(), index);
        }
    }

    if !reader.peek_node_is(true, &ALIAS_RIGHT) {
        return cur;
    }
    let Some(start) = reader.cur_index() else {
        return cur;
    };
    let (end, _) = reader.peek_node(true);
    reader.next_node(true);

    Node::list(
        ListKind::Aliased {
            real_name: 0,
            as_token: None,
            aliased_name: end - start,
        },
        reader.nodes_with_range(start, end + 1),
    )
}

/// Fuses `name AS alias`. The `AS` must be followed by an identifier or
/// the run is left untouched.
fn parse_aliased(cur: Node, reader: &mut NodeReader) -> Node {
    if !ALIAS_LEFT.is_match(&cur) {
        return cur;
    }
    let mut cur = cur;
    if ALIAS_RECURSION.is_match(&cur) {
        cur = parse_infix_group(cur, &ALIAS_AS, true, parse_aliased);
        if let Some(index) = reader.cur_index() {
            reader.replace(cur.clone(), index);
        }
    }

    let Some(start) = reader.cur_index() else {
        return cur;
    };
    let (as_index, _) = reader.peek_node(true);
    let mut tmp = reader.copy_reader();
    tmp.next_node(true); // onto AS

    if !tmp.peek_node_is(true, &ALIAS_RIGHT) {
        return cur;
    }
    let (end, _) = tmp.peek_node(true);
    tmp.next_node(true); // onto the alias
    reader.sync_to(&tmp);

    Node::list(
        ListKind::Aliased {
            real_name: 0,
            as_token: Some(as_index - start),
            aliased_name: end - start,
        },
        reader.nodes_with_range(start, end + 1),
    )
}

const IDENTIFIER_LIST_COMMA: Matcher = Matcher::tokens(&[TokenKind::Comma]);
const IDENTIFIER_LIST_TARGET: Matcher = Matcher {
    node_types: &[
        NodeType::FunctionLiteral,
        NodeType::Identifier,
        NodeType::MemberIdentifier,
        NodeType::Aliased,
        NodeType::Comparison,
        NodeType::Operator,
        NodeType::SwitchCase,
    ],
    expect_tokens: &[
        TokenKind::Number,
        TokenKind::Char,
        TokenKind::SingleQuotedString,
        TokenKind::NationalStringLiteral,
    ],
    expect_keyword: &[],
    expect_sql_type: &[],
};

/// Consumes a comma-separated run of identifier-like elements. A dangling
/// comma terminates the list with a partial tail that keeps the
/// whitespace after the comma.
fn parse_identifier_list(cur: Node, reader: &mut NodeReader) -> Node {
    if !IDENTIFIER_LIST_TARGET.is_match(&cur) {
        return cur;
    }
    let Some(start) = reader.cur_index() else {
        return cur;
    };
    let mut item_indices = vec![start];
    let mut end = start;
    let mut tmp = reader.copy_reader();
    tmp.next_node(true); // onto the comma

    loop {
        if !tmp.peek_node_is(true, &IDENTIFIER_LIST_TARGET) {
            let (peek_index, peek) = tmp.peek_node(true);
            if peek.is_some() {
                end = peek_index.saturating_sub(1);
                tmp.jump(peek_index);
            } else {
                end = tmp.tail_node().0.saturating_sub(1);
                tmp.jump_to_end();
            }
            break;
        }

        let (peek_index, _) = tmp.peek_node(true);
        item_indices.push(peek_index);
        end = peek_index;

        tmp.next_node(true); // onto the element
        if !tmp.peek_node_is(true, &IDENTIFIER_LIST_COMMA) {
            break;
        }
        tmp.next_node(true); // onto the comma
    }
    reader.sync_to(&tmp);

    let items = item_indices.iter().map(|i| i - start).collect();
    Node::list(
        ListKind::IdentifierList { items },
        reader.nodes_with_range(start, end + 1),
    )
}
