//! Concrete syntax trees
//!
//! A [`Tree`] owns its source text and a flat arena of nodes; [`Node`] is a
//! cheap, copyable view into that arena.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::language::Language;

/// A position in the source: zero-based row and byte column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Point { row, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind_id: u16,
    pub(crate) named: bool,
    pub(crate) extra: bool,
    pub(crate) field_id: Option<u16>,
    pub(crate) start_byte: usize,
    pub(crate) end_byte: usize,
    pub(crate) start: Point,
    pub(crate) end: Point,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

/// A parsed PPL source file.
pub struct Tree {
    language: Language,
    source: String,
    nodes: Vec<NodeData>,
}

impl Tree {
    /// `nodes[0]` must be the root.
    pub(crate) fn new(language: Language, source: String, nodes: Vec<NodeData>) -> Self {
        Tree {
            language,
            source,
            nodes,
        }
    }

    pub fn root_node(&self) -> Node<'_> {
        Node { tree: self, id: 0 }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of nodes, anonymous tokens included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in pre-order, starting at the root.
    pub fn walk(&self) -> Descendants<'_> {
        self.root_node().descendants()
    }

    fn data(&self, id: usize) -> &NodeData {
        &self.nodes[id]
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Tree {:?}}}", self.root_node())
    }
}

/// A single node within a [`Tree`].
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    tree: &'tree Tree,
    id: usize,
}

impl<'tree> Node<'tree> {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn kind(&self) -> &'static str {
        self.tree
            .language
            .node_kind_for_id(self.kind_id())
            .unwrap_or("ERROR")
    }

    pub fn kind_id(&self) -> u16 {
        self.data().kind_id
    }

    /// Named nodes correspond to grammar rules; anonymous nodes are keyword
    /// tokens.
    pub fn is_named(&self) -> bool {
        self.data().named
    }

    /// Comments may appear between any two items and are not part of the
    /// surrounding structure.
    pub fn is_extra(&self) -> bool {
        self.data().extra
    }

    /// The field this node occupies in its parent, if any.
    pub fn field_name(&self) -> Option<&'static str> {
        self.data()
            .field_id
            .and_then(|id| self.tree.language.field_name_for_id(id))
    }

    pub fn start_byte(&self) -> usize {
        self.data().start_byte
    }

    pub fn end_byte(&self) -> usize {
        self.data().end_byte
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }

    pub fn start_position(&self) -> Point {
        self.data().start
    }

    pub fn end_position(&self) -> Point {
        self.data().end
    }

    pub fn parent(&self) -> Option<Node<'tree>> {
        self.data().parent.map(|id| self.node(id))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node<'tree>> {
        self.data().children.get(index).map(|id| self.node(*id))
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'tree>> + 'tree {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |id| Node { tree, id: *id })
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    pub fn named_child(&self, index: usize) -> Option<Node<'tree>> {
        self.named_children().nth(index)
    }

    pub fn named_children(&self) -> impl Iterator<Item = Node<'tree>> + 'tree {
        self.children().filter(|child| child.is_named())
    }

    /// First child stored under `field`.
    pub fn child_by_field_name(&self, field: &str) -> Option<Node<'tree>> {
        self.children_by_field_name(field).next()
    }

    pub fn children_by_field_name(&self, field: &str) -> impl Iterator<Item = Node<'tree>> + 'tree {
        let field_id = self.tree.language.field_id_for_name(field);
        self.children()
            .filter(move |child| field_id.is_some() && child.data().field_id == field_id)
    }

    /// The source text this node spans.
    pub fn utf8_text(&self) -> &'tree str {
        &self.tree.source[self.byte_range()]
    }

    /// This node and everything below it, in pre-order.
    pub fn descendants(&self) -> Descendants<'tree> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
        }
    }

    /// Render the named structure below this node as an s-expression.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.kind());
        for child in self.named_children() {
            out.push(' ');
            if let Some(field) = child.field_name() {
                out.push_str(field);
                out.push_str(": ");
            }
            child.write_sexp(out);
        }
        out.push(')');
    }

    fn node(&self, id: usize) -> Node<'tree> {
        Node {
            tree: self.tree,
            id,
        }
    }

    fn data(&self) -> &'tree NodeData {
        self.tree.data(self.id)
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start_position();
        let end = self.end_position();
        write!(
            f,
            "{{Node {} [{}, {}] - [{}, {}]}}",
            self.kind(),
            start.row,
            start.column,
            end.row,
            end.column
        )
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'tree> {
    tree: &'tree Tree,
    stack: Vec<usize>,
}

impl<'tree> Iterator for Descendants<'tree> {
    type Item = Node<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.data(id).children.iter().rev().copied());
        Some(Node {
            tree: self.tree,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_root_spans_whole_source() {
        let source = "PRINTLN \"hi\"\n";
        let tree = parse(source).unwrap();
        let root = tree.root_node();
        assert_eq!(root.kind(), "source_file");
        assert_eq!(root.byte_range(), 0..source.len());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_positions_use_byte_columns() {
        let tree = parse("INTEGER a\n  a = 1\n").unwrap();
        let assign = tree
            .walk()
            .find(|n| n.kind() == "let_statement")
            .unwrap();
        assert_eq!(assign.start_position(), Point::new(1, 2));
        assert_eq!(assign.end_position(), Point::new(1, 7));
        assert_eq!(assign.utf8_text(), "a = 1");
    }

    #[test]
    fn test_field_access() {
        let tree = parse("x = y + 1").unwrap();
        let stmt = tree.root_node().named_child(0).unwrap();
        assert_eq!(stmt.kind(), "let_statement");
        let target = stmt.child_by_field_name("target").unwrap();
        assert_eq!(target.utf8_text(), "x");
        assert_eq!(target.field_name(), Some("target"));
        let value = stmt.child_by_field_name("value").unwrap();
        assert_eq!(value.kind(), "binary_expression");
        assert!(stmt.child_by_field_name("no_such_field").is_none());
    }

    #[test]
    fn test_parent_links() {
        let tree = parse("x = LEN(s)").unwrap();
        for node in tree.walk() {
            for child in node.children() {
                assert_eq!(child.parent(), Some(node));
            }
        }
    }

    #[test]
    fn test_children_nest_inside_parent() {
        let tree = parse("IF (a > 1) THEN\n  PRINTLN a\nENDIF\n").unwrap();
        for node in tree.walk() {
            let mut last_end = node.start_byte();
            for child in node.children() {
                assert!(child.start_byte() >= last_end, "{:?} overlaps", child);
                assert!(child.end_byte() <= node.end_byte());
                last_end = child.end_byte();
            }
        }
    }

    #[test]
    fn test_anonymous_keywords_are_children() {
        let tree = parse("WHILE (x) DO\nENDWHILE").unwrap();
        let stmt = tree.root_node().child(0).unwrap();
        let tokens: Vec<_> = stmt
            .children()
            .filter(|c| !c.is_named())
            .map(|c| c.kind())
            .collect();
        assert_eq!(tokens, vec!["WHILE", "DO", "ENDWHILE"]);
    }

    #[test]
    fn test_debug_format() {
        let tree = parse("BREAK").unwrap();
        let node = tree.root_node().child(0).unwrap();
        assert_eq!(format!("{:?}", node), "{Node break_statement [0, 0] - [0, 5]}");
    }
}
