//! Incremental builder for green trees.

use text_size::{TextRange, TextSize};

use crate::{GreenElement, GreenNode, GreenTrivia, NodeCache, SyntaxKind};

/// Builds a `GreenNode` from a flat sequence of start, token and finish calls.
///
/// Token text is sliced out of the source text handed to [`Builder::new`], so
/// callers only pass ranges.
pub struct Builder<'a> {
    text: &'a str,
    cache: &'a mut NodeCache,
    parents: Vec<(SyntaxKind, usize)>,
    children: Vec<GreenElement>,
}

impl<'a> Builder<'a> {
    pub fn new(text: &'a str, cache: &'a mut NodeCache) -> Self {
        Self { text, cache, parents: Vec::with_capacity(32), children: Vec::with_capacity(256) }
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push((kind, self.children.len()));
    }

    /// Adds a token; `kind_range` excludes the trivia on either side.
    pub fn token(
        &mut self,
        leading: GreenTrivia,
        kind: SyntaxKind,
        kind_range: TextRange,
        trailing: GreenTrivia,
    ) {
        let start = kind_range.start() - leading.len();
        let end = kind_range.end() + trailing.len();
        let text = &self.text[TextRange::new(start, end)];

        let token = self.cache.token(leading, kind, text, trailing);
        self.children.push(token.into());
    }

    /// Adds an already built subtree, sharing it instead of rebuilding.
    pub fn reuse(&mut self, element: GreenElement) {
        self.children.push(element);
    }

    /// Finishes the most recently started node.
    pub fn finish_node(&mut self) {
        let (kind, first_child) = self.parents.pop().expect("no opened nodes?");
        let children = self.children.drain(first_child..).collect();
        let node = self.cache.node(kind, children);
        self.children.push(node.into());
    }

    /// Byte length of everything added so far.
    pub fn text_len(&self) -> TextSize {
        self.children.iter().map(GreenElement::text_len).sum()
    }

    pub fn finish(mut self) -> GreenNode {
        assert!(self.parents.is_empty(), "unfinished nodes");
        assert_eq!(self.children.len(), 1, "expected exactly one root node");

        match self.children.pop() {
            Some(GreenElement::Node(node)) => node,
            _ => panic!("the root must be a node"),
        }
    }
}
