//! Immutable, position-independent tree storage.
//!
//! Green nodes know their kind, their width and their children, nothing else.
//! They are reference counted so an edited tree can share every subtree that
//! did not change with the tree it was derived from.

use std::fmt;

use text_size::TextSize;
use triomphe::{Arc, ThinArc};

use crate::{NodeOrToken, SyntaxKind, TriviaPiece};

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

impl GreenElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_len(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.text_len(),
            NodeOrToken::Token(token) => token.text_len(),
        }
    }

    /// Identity comparison: `true` only if both elements are the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeOrToken::Node(left), NodeOrToken::Node(right)) => left.ptr_eq(right),
            (NodeOrToken::Token(left), NodeOrToken::Token(right)) => left.ptr_eq(right),
            _ => false,
        }
    }

    pub(crate) fn addr(&self) -> usize {
        match self {
            NodeOrToken::Node(node) => node.addr(),
            NodeOrToken::Token(token) => token.addr(),
        }
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        NodeOrToken::Node(node)
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        NodeOrToken::Token(token)
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GreenNode {
    data: Arc<GreenNodeData>,
}

#[derive(PartialEq, Eq, Hash)]
struct GreenNodeData {
    kind: SyntaxKind,
    text_len: TextSize,
    children: Box<[GreenElement]>,
}

impl GreenNode {
    pub fn new(kind: SyntaxKind, children: Vec<GreenElement>) -> Self {
        let text_len = children.iter().map(GreenElement::text_len).sum();
        Self { data: Arc::new(GreenNodeData { kind, text_len, children: children.into() }) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    pub fn text_len(&self) -> TextSize {
        self.data.text_len
    }

    pub fn children(&self) -> &[GreenElement] {
        &self.data.children
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq::<GreenNodeData>(&*self.data, &*other.data)
    }

    fn addr(&self) -> usize {
        std::ptr::from_ref::<GreenNodeData>(&self.data) as usize
    }

    /// `true` if nothing else holds this node.
    pub(crate) fn is_unique(&self) -> bool {
        self.data.is_unique()
    }

    fn write_text(&self, buf: &mut String) {
        for child in self.children() {
            match child {
                NodeOrToken::Node(node) => node.write_text(buf),
                NodeOrToken::Token(token) => buf.push_str(token.text()),
            }
        }
    }
}

impl fmt::Display for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::with_capacity(self.text_len().into());
        self.write_text(&mut buf);
        f.write_str(&buf)
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenNode")
            .field("kind", &self.kind())
            .field("text_len", &self.text_len())
            .field("children", &self.children().len())
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GreenToken {
    data: Arc<GreenTokenData>,
}

#[derive(PartialEq, Eq, Hash)]
struct GreenTokenData {
    leading: GreenTrivia,
    kind: SyntaxKind,
    /// Full text, trivia included.
    text: Box<str>,
    trailing: GreenTrivia,
}

impl GreenToken {
    pub fn new(leading: GreenTrivia, kind: SyntaxKind, text: &str, trailing: GreenTrivia) -> Self {
        debug_assert!(leading.len() + trailing.len() <= TextSize::of(text));
        Self { data: Arc::new(GreenTokenData { leading, kind, text: text.into(), trailing }) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    pub fn text(&self) -> &str {
        &self.data.text
    }

    pub fn text_len(&self) -> TextSize {
        TextSize::of(self.text())
    }

    pub fn leading(&self) -> &GreenTrivia {
        &self.data.leading
    }

    pub fn trailing(&self) -> &GreenTrivia {
        &self.data.trailing
    }

    pub fn text_trimmed(&self) -> &str {
        let start: usize = self.leading().len().into();
        let end: usize = (self.text_len() - self.trailing().len()).into();

        &self.text()[start..end]
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq::<GreenTokenData>(&*self.data, &*other.data)
    }

    fn addr(&self) -> usize {
        std::ptr::from_ref::<GreenTokenData>(&self.data) as usize
    }

    pub(crate) fn is_unique(&self) -> bool {
        self.data.is_unique()
    }
}

impl fmt::Display for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenToken")
            .field("kind", &self.kind())
            .field("text", &self.text())
            .field("leading", self.leading())
            .field("trailing", self.trailing())
            .finish()
    }
}

#[derive(Clone, Eq, Hash, PartialEq)]
pub struct GreenTrivia {
    ptr: Option<ThinArc<TextSize, TriviaPiece>>,
}

impl fmt::Debug for GreenTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenTrivia")
            .field("pieces", &self.pieces())
            .field("total_len", &self.len())
            .finish()
    }
}

impl GreenTrivia {
    pub fn new(pieces: &[TriviaPiece]) -> Self {
        if pieces.is_empty() {
            return Self::empty();
        }
        let total_len = pieces.iter().map(|piece| piece.len).sum();
        Self { ptr: Some(ThinArc::from_header_and_slice(total_len, pieces)) }
    }

    pub const fn empty() -> Self {
        Self { ptr: None }
    }

    pub fn len(&self) -> TextSize {
        match self.ptr {
            None => TextSize::new(0),
            Some(ref ptr) => ptr.header.header,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        match &self.ptr {
            None => &[],
            Some(ptr) => &ptr.slice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriviaPieceKind;

    fn whitespace(len: u32) -> GreenTrivia {
        GreenTrivia::new(&[TriviaPiece::new(TriviaPieceKind::Whitespace, len.into())])
    }

    #[test]
    fn token_text() {
        let token = GreenToken::new(whitespace(3), SyntaxKind::SELECT_KW, "\n\t select \t\t", whitespace(3));

        assert_eq!("\n\t select \t\t", token.text());
        assert_eq!("select", token.text_trimmed());
        assert_eq!(token.text_len(), TextSize::new(12));
    }

    #[test]
    fn node_len_and_text() {
        let select = GreenToken::new(GreenTrivia::empty(), SyntaxKind::SELECT_KW, "SELECT ", whitespace(1));
        let ident = GreenToken::new(GreenTrivia::empty(), SyntaxKind::IDENT, "u", GreenTrivia::empty());
        let missing = GreenNode::new(SyntaxKind::MISSING, Vec::new());
        let node = GreenNode::new(
            SyntaxKind::SELECT_CLAUSE,
            vec![select.into(), missing.into(), ident.into()],
        );

        assert_eq!(node.text_len(), TextSize::new(8));
        assert_eq!(node.to_string(), "SELECT u");
    }

    #[test]
    fn empty_trivia_has_no_allocation() {
        assert!(GreenTrivia::new(&[]).is_empty());
        assert_eq!(GreenTrivia::new(&[]), GreenTrivia::empty());
        assert_eq!(whitespace(2).len(), TextSize::new(2));
    }
}
