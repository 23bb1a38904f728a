//! Whitespace cleanup after the main formatting pass.
//!
//! The main rewrite keeps the source's inter-token whitespace leaves next
//! to the decoration it inserts. This pass removes the leaves that would
//! corrupt the layout: whitespace that would trail at end-of-line, stray
//! whitespace directly after an inserted indent or line break, and doubled
//! whitespace runs. It is idempotent and carries no indent state.

use plane_syntax::{ListKind, Node};

/// Trims whitespace around line breaks across the whole tree.
pub fn trim_trailing_whitespace(node: Node) -> Node {
    match node {
        // Inserted decorations are atomic; their whitespace is the point.
        Node::List(list) if list.kind == ListKind::Indent || list.kind == ListKind::LineBreak => {
            Node::List(list)
        }
        Node::List(mut list) => {
            let children: Vec<Node> = list
                .children
                .drain(..)
                .map(trim_trailing_whitespace)
                .collect();
            list.children = trim_children(children);
            Node::List(list)
        }
        leaf => leaf,
    }
}

fn trim_children(children: Vec<Node>) -> Vec<Node> {
    // Right to left: drop whitespace leaves that would land at the end of
    // a line, including a nested list's trailing run.
    let mut kept: Vec<Node> = Vec::new();
    let mut next_starts_linebreak = false;
    for node in children.into_iter().rev() {
        if next_starts_linebreak && is_whitespace_item(&node) {
            continue;
        }
        let node = if next_starts_linebreak {
            trim_list_tail(node)
        } else {
            node
        };
        next_starts_linebreak = starts_with_linebreak(&node);
        kept.push(node);
    }
    kept.reverse();

    // Left to right: collapse whitespace runs and strip whitespace that
    // directly follows an inserted indent or line break.
    let mut out: Vec<Node> = Vec::new();
    for node in kept {
        if is_whitespace_item(&node) {
            if let Some(prev) = out.last() {
                if is_whitespace_item(prev) || is_indent(prev) || is_linebreak(prev) {
                    continue;
                }
            }
        }
        out.push(node);
    }
    out
}

/// Removes a list's trailing whitespace leaves, recursing into a trailing
/// sublist.
fn trim_list_tail(node: Node) -> Node {
    let Node::List(mut list) = node else {
        return node;
    };
    while matches!(list.children.last(), Some(last) if is_whitespace_item(last)) {
        list.children.pop();
    }
    if matches!(list.children.last(), Some(last) if last.is_list()) {
        if let Some(last) = list.children.pop() {
            list.children.push(trim_list_tail(last));
        }
    }
    Node::List(list)
}

fn is_whitespace_item(node: &Node) -> bool {
    node.is_whitespace()
}

fn is_indent(node: &Node) -> bool {
    matches!(node, Node::List(list) if list.kind == ListKind::Indent)
}

fn is_linebreak(node: &Node) -> bool {
    matches!(node, Node::List(list) if list.kind == ListKind::LineBreak)
}

fn starts_with_linebreak(node: &Node) -> bool {
    node.first_token()
        .map_or(false, |tok| tok.text.starts_with('\n'))
}
