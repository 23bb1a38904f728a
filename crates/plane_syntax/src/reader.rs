//! An index-based cursor over one list's child sequence.

use crate::ast::Node;
use crate::matcher::Matcher;

/// A cursor over a child sequence. `index` is one past the current node:
/// after a successful advance the current node is `children[index - 1]`.
///
/// Whitespace skipping is observational only — skipped leaves stay in the
/// sequence and reappear in ranges extracted with [`nodes_with_range`].
///
/// [`nodes_with_range`]: NodeReader::nodes_with_range
#[derive(Debug, Clone)]
pub struct NodeReader {
    children: Vec<Node>,
    pub index: usize,
    cur: Option<usize>,
}

impl NodeReader {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            index: 0,
            cur: None,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The current node, if the cursor has advanced onto one.
    pub fn cur_node(&self) -> Option<&Node> {
        self.cur.and_then(|i| self.children.get(i))
    }

    /// Index of the current node within the child sequence.
    pub fn cur_index(&self) -> Option<usize> {
        self.cur
    }

    /// Advances to the next child; with `ignore_whitespace` set, whitespace
    /// leaves are stepped over. Returns false at the end of the sequence.
    pub fn next_node(&mut self, ignore_whitespace: bool) -> bool {
        loop {
            if self.index >= self.children.len() {
                return false;
            }
            let cur = self.index;
            self.cur = Some(cur);
            self.index += 1;
            if !(ignore_whitespace && self.children[cur].is_whitespace()) {
                return true;
            }
        }
    }

    /// The next child without moving the cursor; with `ignore_whitespace`
    /// set, the first non-whitespace child. Returns `(index, None)` at the
    /// end of the sequence.
    pub fn peek_node(&self, ignore_whitespace: bool) -> (usize, Option<&Node>) {
        let mut i = self.index;
        while i < self.children.len() {
            let node = &self.children[i];
            if !ignore_whitespace || !node.is_whitespace() {
                return (i, Some(node));
            }
            i += 1;
        }
        (self.index, None)
    }

    pub fn peek_node_is(&self, ignore_whitespace: bool, matcher: &Matcher) -> bool {
        match self.peek_node(ignore_whitespace) {
            (_, Some(node)) => matcher.is_match(node),
            _ => false,
        }
    }

    pub fn cur_node_is(&self, matcher: &Matcher) -> bool {
        self.cur_node().map_or(false, |node| matcher.is_match(node))
    }

    /// Searches forward for a matching node and returns a copy of the
    /// reader positioned at the match.
    pub fn find_node(&self, ignore_whitespace: bool, matcher: &Matcher) -> Option<NodeReader> {
        let mut tmp = self.clone();
        while tmp.next_node(ignore_whitespace) {
            if tmp.cur_node_is(matcher) {
                return Some(tmp);
            }
        }
        None
    }

    /// The last child and an index one past it.
    pub fn tail_node(&self) -> (usize, Option<&Node>) {
        (self.children.len(), self.children.last())
    }

    /// Clones the children in `[start, end)`, whitespace leaves included.
    pub fn nodes_with_range(&self, start: usize, end: usize) -> Vec<Node> {
        let end = end.min(self.children.len());
        let start = start.min(end);
        self.children[start..end].to_vec()
    }

    /// An independent cursor at the same position.
    pub fn copy_reader(&self) -> NodeReader {
        self.clone()
    }

    /// Overwrites `children[index]`.
    pub fn replace(&mut self, node: Node, index: usize) {
        if let Some(slot) = self.children.get_mut(index) {
            *slot = node;
        }
    }

    /// Repositions the read index; the current node is left untouched.
    pub fn jump(&mut self, index: usize) {
        self.index = index;
    }

    /// Repositions past the last child, seating the cursor on it.
    pub fn jump_to_end(&mut self) {
        self.index = self.children.len();
        self.cur = self.children.len().checked_sub(1);
    }

    /// Adopts another reader's position. The other reader must have been
    /// copied from this one, so both see the same child sequence.
    pub fn sync_to(&mut self, other: &NodeReader) {
        self.index = other.index;
        self.cur = other.cur;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ListKind;
    use crate::token::{Token, TokenKind};

    fn word(text: &str) -> Node {
        Node::Item(Token::detached(TokenKind::Word, text))
    }

    fn ws() -> Node {
        Node::Item(Token::detached(TokenKind::Whitespace, " "))
    }

    fn reader() -> NodeReader {
        NodeReader::new(vec![word("a"), ws(), word("b"), ws(), word("c")])
    }

    #[test]
    fn test_next_node_visits_all_children() {
        let mut r = reader();
        let mut texts = Vec::new();
        while r.next_node(false) {
            texts.push(r.cur_node().unwrap().to_string());
        }
        assert_eq!(texts, vec!["a", " ", "b", " ", "c"]);
    }

    #[test]
    fn test_next_node_skips_whitespace() {
        let mut r = reader();
        let mut texts = Vec::new();
        while r.next_node(true) {
            texts.push(r.cur_node().unwrap().to_string());
        }
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cursor_convention() {
        let mut r = reader();
        assert!(r.next_node(false));
        // After an advance the current node sits at index - 1.
        assert_eq!(r.index, 1);
        assert_eq!(r.cur_index(), Some(0));
    }

    #[test]
    fn test_peek_does_not_move() {
        let mut r = reader();
        r.next_node(false);
        let (idx, node) = r.peek_node(true);
        assert_eq!(idx, 2);
        assert_eq!(node.unwrap().to_string(), "b");
        assert_eq!(r.index, 1);
    }

    #[test]
    fn test_peek_at_end() {
        let mut r = NodeReader::new(vec![word("a"), ws()]);
        r.next_node(false);
        let (idx, node) = r.peek_node(true);
        assert_eq!(idx, r.index);
        assert!(node.is_none());
    }

    #[test]
    fn test_find_node_returns_positioned_copy() {
        let mut r = reader();
        r.next_node(false);
        let matcher = Matcher::keywords(&["c"]);
        let found = r.find_node(true, &matcher).unwrap();
        assert_eq!(found.cur_index(), Some(4));
        // The original reader did not move.
        assert_eq!(r.index, 1);
    }

    #[test]
    fn test_find_node_misses() {
        let r = reader();
        let matcher = Matcher::keywords(&["missing"]);
        assert!(r.find_node(true, &matcher).is_none());
    }

    #[test]
    fn test_tail_node() {
        let r = reader();
        let (idx, node) = r.tail_node();
        assert_eq!(idx, 5);
        assert_eq!(node.unwrap().to_string(), "c");
    }

    #[test]
    fn test_nodes_with_range_keeps_whitespace() {
        let r = reader();
        let nodes = r.nodes_with_range(0, 3);
        let rendered: String = nodes.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, "a b");
    }

    #[test]
    fn test_replace_is_visible_in_ranges() {
        let mut r = reader();
        r.replace(word("x"), 0);
        let nodes = r.nodes_with_range(0, 1);
        assert_eq!(nodes[0].to_string(), "x");
    }

    #[test]
    fn test_copy_reader_is_independent() {
        let mut r = reader();
        r.next_node(false);
        let mut copy = r.copy_reader();
        copy.next_node(false);
        assert_eq!(r.index, 1);
        assert_eq!(copy.index, 2);
    }
}
