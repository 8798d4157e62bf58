//! Public syntax tree API built on top of the shared green tree.
//!
//! A [`SyntaxTree`] lays every element of a green tree out in a flat arena,
//! breadth first, so the children of a node occupy a contiguous index range
//! and each entry knows its parent and absolute offset. Handles are plain
//! `(tree, index)` pairs tied to the lifetime of the tree.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use text_size::{TextRange, TextSize};

use crate::{GreenElement, GreenNode, GreenToken, SyntaxKind, TriviaPiece};

/// Owned syntax tree for a single source text.
#[derive(Clone)]
pub struct SyntaxTree {
    text: Box<str>,
    green: GreenNode,
    entries: Vec<Entry>,
}

#[derive(Clone)]
struct Entry {
    element: GreenElement,
    parent: Option<u32>,
    offset: TextSize,
    first_child: u32,
    child_count: u32,
}

impl Entry {
    fn range(&self) -> TextRange {
        TextRange::at(self.offset, self.element.text_len())
    }

    fn children(&self) -> std::ops::Range<u32> {
        self.first_child..self.first_child + self.child_count
    }
}

impl SyntaxTree {
    /// Lays out `green` over `text`; the two must have the same length.
    ///
    /// The arena is built eagerly, one entry per element, so this is linear
    /// in the size of the whole tree even when most of `green` is shared
    /// with an earlier tree. Incremental re-parsing saves lexing and parsing,
    /// not this layout pass.
    pub fn new(text: impl Into<Box<str>>, green: GreenNode) -> Self {
        let text = text.into();
        assert_eq!(TextSize::of(&*text), green.text_len(), "tree does not cover the text");

        let mut entries = vec![Entry {
            element: green.clone().into(),
            parent: None,
            offset: TextSize::new(0),
            first_child: 0,
            child_count: 0,
        }];

        let mut index = 0;
        while index < entries.len() {
            if let GreenElement::Node(node) = &entries[index].element {
                let node = node.clone();
                let first_child = entries.len() as u32;
                let mut offset = entries[index].offset;

                for child in node.children() {
                    entries.push(Entry {
                        element: child.clone(),
                        parent: Some(index as u32),
                        offset,
                        first_child: 0,
                        child_count: 0,
                    });
                    offset += child.text_len();
                }

                entries[index].first_child = first_child;
                entries[index].child_count = node.children().len() as u32;
            }
            index += 1;
        }

        Self { text, green, entries }
    }

    /// Returns the root syntax node.
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, index: 0 }
    }

    /// Returns the full source text for this tree.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Number of nodes and tokens in the tree.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }

    /// Indented `KIND@start..end` rendering, one element per line.
    pub fn debug_dump(&self) -> String {
        self.root().debug_dump()
    }

    fn element(&self, index: u32) -> SyntaxElement<'_> {
        match self.entries[index as usize].element {
            GreenElement::Node(_) => SyntaxElement::Node(SyntaxNode { tree: self, index }),
            GreenElement::Token(_) => SyntaxElement::Token(SyntaxToken { tree: self, index }),
        }
    }

    fn next_sibling(&self, index: u32) -> Option<u32> {
        let parent = self.entries[index as usize].parent?;
        let next = index + 1;
        self.entries[parent as usize].children().contains(&next).then_some(next)
    }

    fn prev_sibling(&self, index: u32) -> Option<u32> {
        let parent = self.entries[index as usize].parent?;
        let siblings = self.entries[parent as usize].children();
        (index > siblings.start).then(|| index - 1)
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("text_len", &self.text().len())
            .field("elements", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// Token handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a SyntaxTree,
    index: u32,
}

impl<'a> SyntaxToken<'a> {
    fn entry(self) -> &'a Entry {
        &self.tree.entries[self.index as usize]
    }

    pub fn green(self) -> &'a GreenToken {
        match &self.entry().element {
            GreenElement::Token(token) => token,
            GreenElement::Node(_) => unreachable!("token handle points at a node"),
        }
    }

    /// Returns this token's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.green().kind()
    }

    /// Full range, trivia included.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.entry().range()
    }

    /// Range of the token itself, without its trivia.
    pub fn trimmed_range(self) -> TextRange {
        let range = self.text_range();
        let green = self.green();
        TextRange::new(range.start() + green.leading().len(), range.end() - green.trailing().len())
    }

    #[inline]
    pub fn text(self) -> &'a str {
        self.green().text()
    }

    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        self.green().text_trimmed()
    }

    pub fn leading_trivia(self) -> &'a [TriviaPiece] {
        self.green().leading().pieces()
    }

    pub fn trailing_trivia(self) -> &'a [TriviaPiece] {
        self.green().trailing().pieces()
    }

    pub fn parent(self) -> SyntaxNode<'a> {
        let parent = self.entry().parent.expect("tokens always have a parent");
        SyntaxNode { tree: self.tree, index: parent }
    }

    /// The next token in document order, skipping over empty nodes.
    pub fn next_token(self) -> Option<Self> {
        let tree = self.tree;
        let mut index = self.index;
        loop {
            match tree.next_sibling(index) {
                Some(next) => {
                    match tree.element(next) {
                        SyntaxElement::Token(token) => return Some(token),
                        SyntaxElement::Node(node) => {
                            if let Some(token) = node.first_token() {
                                return Some(token);
                            }
                        }
                    }
                    index = next;
                }
                None => index = tree.entries[index as usize].parent?,
            }
        }
    }

    /// The previous token in document order, skipping over empty nodes.
    pub fn prev_token(self) -> Option<Self> {
        let tree = self.tree;
        let mut index = self.index;
        loop {
            match tree.prev_sibling(index) {
                Some(prev) => {
                    match tree.element(prev) {
                        SyntaxElement::Token(token) => return Some(token),
                        SyntaxElement::Node(node) => {
                            if let Some(token) = node.last_token() {
                                return Some(token);
                            }
                        }
                    }
                    index = prev;
                }
                None => index = tree.entries[index as usize].parent?,
            }
        }
    }
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxToken<'_> {}

impl Hash for SyntaxToken<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::from_ref(self.tree).hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.text_range(), self.text())
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a SyntaxTree,
    index: u32,
}

pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

impl<'a> SyntaxElement<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    pub fn parent(&self) -> Option<SyntaxNode<'a>> {
        match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => Some(token.parent()),
        }
    }
}

impl<'a> SyntaxNode<'a> {
    fn entry(self) -> &'a Entry {
        &self.tree.entries[self.index as usize]
    }

    pub fn green(self) -> &'a GreenNode {
        match &self.entry().element {
            GreenElement::Node(node) => node,
            GreenElement::Token(_) => unreachable!("node handle points at a token"),
        }
    }

    pub fn tree(self) -> &'a SyntaxTree {
        self.tree
    }

    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.green().kind()
    }

    /// Full range, trivia of the first and last token included.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.entry().range()
    }

    /// Range from the first to the last non-trivia byte.
    pub fn trimmed_range(self) -> TextRange {
        match (self.first_token(), self.last_token()) {
            (Some(first), Some(last)) => {
                TextRange::new(first.trimmed_range().start(), last.trimmed_range().end())
            }
            _ => TextRange::empty(self.text_range().start()),
        }
    }

    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    pub fn is_missing(self) -> bool {
        self.kind() == SyntaxKind::MISSING
    }

    pub fn is_error(self) -> bool {
        self.kind() == SyntaxKind::ERROR
    }

    pub fn parent(self) -> Option<Self> {
        self.entry().parent.map(|index| SyntaxNode { tree: self.tree, index })
    }

    /// This node followed by all of its ancestors, innermost first.
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |node| node.parent())
    }

    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { tree: self.tree, range: self.entry().children() }
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + Clone {
        self.children_with_tokens().filter_map(NodeOrToken::into_node)
    }

    pub fn first_child(self) -> Option<Self> {
        self.children().next()
    }

    pub fn next_sibling(self) -> Option<Self> {
        let mut index = self.index;
        while let Some(next) = self.tree.next_sibling(index) {
            if let SyntaxElement::Node(node) = self.tree.element(next) {
                return Some(node);
            }
            index = next;
        }
        None
    }

    pub fn prev_sibling(self) -> Option<Self> {
        let mut index = self.index;
        while let Some(prev) = self.tree.prev_sibling(index) {
            if let SyntaxElement::Node(node) = self.tree.element(prev) {
                return Some(node);
            }
            index = prev;
        }
        None
    }

    /// First token of the subtree; `None` for empty nodes such as `MISSING`.
    pub fn first_token(self) -> Option<SyntaxToken<'a>> {
        self.children_with_tokens().find_map(|child| match child {
            NodeOrToken::Node(node) => node.first_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    pub fn last_token(self) -> Option<SyntaxToken<'a>> {
        self.children_with_tokens().rev().find_map(|child| match child {
            NodeOrToken::Node(node) => node.last_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    /// All nodes of the subtree in preorder, this node first.
    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    pub fn descendants_with_tokens(self) -> impl Iterator<Item = SyntaxElement<'a>> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEventWithTokens::EnterNode(node) => Some(NodeOrToken::Node(node)),
            WalkEventWithTokens::Token(token) => Some(NodeOrToken::Token(token)),
            WalkEventWithTokens::LeaveNode(_) => None,
        })
    }

    /// All tokens of the subtree in document order.
    pub fn tokens(self) -> impl Iterator<Item = SyntaxToken<'a>> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEventWithTokens::Token(token) => Some(token),
            _ => None,
        })
    }

    /// Returns a preorder iterator over nodes.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder::new(self)
    }

    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }

    /// The child element whose range holds `offset`, ignoring empty children.
    fn child_at_offset(self, offset: TextSize) -> Option<SyntaxElement<'a>> {
        let children = self.entry().children();
        let entries = &self.tree.entries[children.start as usize..children.end as usize];
        let position = entries.partition_point(|entry| entry.range().end() <= offset);

        let entry = entries.get(position)?;
        if entry.offset > offset {
            return None;
        }
        Some(self.tree.element(children.start + position as u32))
    }

    /// Smallest node whose range contains `offset`.
    ///
    /// An offset equal to the end of this node resolves to this node.
    pub fn node_at_offset(self, offset: TextSize) -> Option<SyntaxNode<'a>> {
        let range = self.text_range();
        if offset < range.start() || offset > range.end() {
            return None;
        }

        let mut node = self;
        while let Some(NodeOrToken::Node(child)) = node.child_at_offset(offset) {
            node = child;
        }
        Some(node)
    }

    fn token_containing(self, offset: TextSize) -> Option<SyntaxToken<'a>> {
        let mut node = self;
        loop {
            match node.child_at_offset(offset)? {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }

    pub fn token_at_offset(self, offset: TextSize) -> TokenAtOffset<SyntaxToken<'a>> {
        let range = self.text_range();
        if range.is_empty() || offset < range.start() || offset > range.end() {
            return TokenAtOffset::None;
        }

        match self.token_containing(offset) {
            Some(token) => {
                if token.text_range().start() == offset && offset != range.start() {
                    if let Some(prev) = token.prev_token() {
                        return TokenAtOffset::Between(prev, token);
                    }
                }
                TokenAtOffset::Single(token)
            }
            None => {
                let mut last = match self.last_token() {
                    Some(token) => token,
                    None => return TokenAtOffset::None,
                };
                while last.text_range().is_empty() {
                    last = match last.prev_token() {
                        Some(token) => token,
                        None => return TokenAtOffset::None,
                    };
                }
                TokenAtOffset::Single(last)
            }
        }
    }

    /// Smallest element whose range covers `range`.
    pub fn covering_element(self, range: TextRange) -> SyntaxElement<'a> {
        let mut node = self;
        'descend: loop {
            for child in node.children_with_tokens() {
                let child_range = child.text_range();
                if child_range.is_empty() || !child_range.contains_range(range) {
                    continue;
                }
                match child {
                    NodeOrToken::Node(child) => {
                        node = child;
                        continue 'descend;
                    }
                    NodeOrToken::Token(token) => return NodeOrToken::Token(token),
                }
            }
            return NodeOrToken::Node(node);
        }
    }

    pub fn debug_dump(self) -> String {
        let mut buf = String::new();
        let mut indent = 0;
        for event in self.preorder_with_tokens() {
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    let _ = writeln!(buf, "{:indent$}{node:?}", "");
                    indent += 2;
                }
                WalkEventWithTokens::Token(token) => {
                    let _ = writeln!(buf, "{:indent$}{token:?}", "");
                }
                WalkEventWithTokens::LeaveNode(_) => indent -= 2,
            }
        }
        buf
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxNode<'_> {}

impl Hash for SyntaxNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::from_ref(self.tree).hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Direct children of a node, tokens included.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    tree: &'a SyntaxTree,
    range: std::ops::Range<u32>,
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(|index| self.tree.element(index))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.range.next_back().map(|index| self.tree.element(index))
    }
}

impl ExactSizeIterator for ChildrenWithTokens<'_> {}

/// Preorder traversal over nodes.
#[derive(Clone)]
pub struct Preorder<'a> {
    inner: PreorderWithTokens<'a>,
}

impl<'a> Preorder<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> Preorder<'a> {
        Preorder { inner: PreorderWithTokens::new(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        self.inner.skip_subtree();
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Copy, Debug)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}

/// Preorder traversal over nodes and tokens.
#[derive(Clone)]
pub struct PreorderWithTokens<'a> {
    stack: Vec<(SyntaxNode<'a>, ChildrenWithTokens<'a>)>,
    root: Option<SyntaxNode<'a>>,
}

impl<'a> PreorderWithTokens<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> PreorderWithTokens<'a> {
        PreorderWithTokens { stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl<'a> Iterator for PreorderWithTokens<'a> {
    type Item = WalkEventWithTokens<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.children_with_tokens()));
            return Some(WalkEventWithTokens::EnterNode(root));
        };
        match active_node.next() {
            Some(SyntaxElement::Node(child)) => {
                self.stack.push((child, child.children_with_tokens()));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(SyntaxElement::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop().expect("should have an exited-from node");
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Copy, Debug)]
pub enum WalkEventWithTokens<'a> {
    EnterNode(SyntaxNode<'a>),
    LeaveNode(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    /// Returns a shared reference to the node, if any.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Returns a shared reference to the token, if any.
    pub fn as_token(&self) -> Option<&T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

/// There might be zero, one or two tokens at a given offset.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    /// No tokens at offset.
    None,
    /// Only a single token at offset.
    Single(T),
    /// Offset is exactly between two tokens.
    Between(T, T),
}

impl<T> TokenAtOffset<T> {
    /// Convert to option, preferring the right token in case of a tie.
    pub fn right_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(_, right) => Some(right),
        }
    }
}

impl<T> Iterator for TokenAtOffset<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::None) {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(left, right) => {
                *self = Self::Single(right);
                Some(left)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::None => (0, Some(0)),
            Self::Single(_) => (1, Some(1)),
            Self::Between(_, _) => (2, Some(2)),
        }
    }
}

impl<T> ExactSizeIterator for TokenAtOffset<T> {}

#[cfg(test)]
mod tests {
    use text_size::{TextRange, TextSize};

    use super::*;
    use crate::{Builder, GreenTrivia, NodeCache, TriviaPieceKind};

    fn space() -> GreenTrivia {
        GreenTrivia::new(&[TriviaPiece::new(TriviaPieceKind::Whitespace, 1.into())])
    }

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    /// `SELECT u, ` followed by a missing expression.
    fn tree() -> SyntaxTree {
        let text = "SELECT u, ";
        let mut cache = NodeCache::new();
        let mut builder = Builder::new(text, &mut cache);

        builder.start_node(SyntaxKind::SOURCE_FILE);
        builder.start_node(SyntaxKind::SELECT_CLAUSE);
        builder.token(GreenTrivia::empty(), SyntaxKind::SELECT_KW, range(0, 6), space());
        builder.start_node(SyntaxKind::IDENTIFICATION_VARIABLE);
        builder.token(GreenTrivia::empty(), SyntaxKind::IDENT, range(7, 8), GreenTrivia::empty());
        builder.finish_node();
        builder.token(GreenTrivia::empty(), SyntaxKind::COMMA, range(8, 9), space());
        builder.start_node(SyntaxKind::MISSING);
        builder.finish_node();
        builder.finish_node();
        builder.token(GreenTrivia::empty(), SyntaxKind::EOF, range(10, 10), GreenTrivia::empty());
        builder.finish_node();

        SyntaxTree::new(text, builder.finish())
    }

    #[test]
    fn shared_green_gets_a_full_layout() {
        let tree = tree();
        let copy = SyntaxTree::new(tree.text(), tree.green().clone());

        assert!(copy.green().ptr_eq(tree.green()));
        assert_eq!(copy.entries.len(), tree.entries.len());
        assert_eq!(copy.entries.len(), 8);
        assert_eq!(copy.debug_dump(), tree.debug_dump());
    }

    #[test]
    fn dump() {
        let tree = tree();
        assert_eq!(
            tree.debug_dump(),
            r#"SOURCE_FILE@0..10
  SELECT_CLAUSE@0..10
    SELECT_KW@0..7 "SELECT "
    IDENTIFICATION_VARIABLE@7..8
      IDENT@7..8 "u"
    COMMA@8..10 ", "
    MISSING@10..10
  EOF@10..10 ""
"#
        );
    }

    #[test]
    fn navigation() {
        let tree = tree();
        let root = tree.root();
        let clause = root.first_child().unwrap();
        assert_eq!(clause.kind(), SyntaxKind::SELECT_CLAUSE);
        assert_eq!(clause.parent(), Some(root));
        assert_eq!(clause.trimmed_range(), range(0, 9));
        assert_eq!(clause.text_trimmed(), "SELECT u,");

        let variable = clause.first_child().unwrap();
        let missing = variable.next_sibling().unwrap();
        assert!(missing.is_missing());
        assert_eq!(missing.prev_sibling(), Some(variable));
        assert_eq!(missing.first_token(), None);
        assert_eq!(missing.trimmed_range(), range(10, 10));

        let tokens: Vec<_> = root.tokens().map(|token| token.kind()).collect();
        assert_eq!(
            tokens,
            [SyntaxKind::SELECT_KW, SyntaxKind::IDENT, SyntaxKind::COMMA, SyntaxKind::EOF]
        );

        let comma = variable.last_token().unwrap().next_token().unwrap();
        assert_eq!(comma.kind(), SyntaxKind::COMMA);
        assert_eq!(comma.text_trimmed(), ",");
        assert_eq!(comma.trailing_trivia().len(), 1);
        assert_eq!(comma.next_token().map(SyntaxToken::kind), Some(SyntaxKind::EOF));
        assert_eq!(comma.prev_token().map(SyntaxToken::kind), Some(SyntaxKind::IDENT));
    }

    #[test]
    fn offsets() {
        let tree = tree();
        let root = tree.root();

        let node = root.node_at_offset(TextSize::new(7)).unwrap();
        assert_eq!(node.kind(), SyntaxKind::IDENTIFICATION_VARIABLE);
        assert_eq!(root.node_at_offset(TextSize::new(3)).unwrap().kind(), SyntaxKind::SELECT_CLAUSE);
        assert!(root.node_at_offset(TextSize::new(11)).is_none());

        match root.token_at_offset(TextSize::new(7)) {
            TokenAtOffset::Between(left, right) => {
                assert_eq!(left.kind(), SyntaxKind::SELECT_KW);
                assert_eq!(right.kind(), SyntaxKind::IDENT);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            root.token_at_offset(TextSize::new(10)).right_biased().map(SyntaxToken::kind),
            Some(SyntaxKind::COMMA)
        );
        assert_eq!(root.token_at_offset(TextSize::new(0)).count(), 1);

        let covering = root.covering_element(range(7, 8));
        assert_eq!(covering.kind(), SyntaxKind::IDENT);
    }

    #[test]
    fn preorder_skips_subtrees() {
        let tree = tree();
        let mut preorder = tree.root().preorder();
        let mut entered = Vec::new();
        while let Some(event) = preorder.next() {
            if let WalkEvent::Enter(node) = event {
                entered.push(node.kind());
                if node.kind() == SyntaxKind::SELECT_CLAUSE {
                    preorder.skip_subtree();
                }
            }
        }
        assert_eq!(entered, [SyntaxKind::SOURCE_FILE, SyntaxKind::SELECT_CLAUSE]);
    }
}
