//! Lossless syntax trees for DQL with attached trivia.
//!
//! Green nodes are immutable and shared between tree versions; a
//! [`SyntaxTree`] adds absolute offsets and parent links on top of a green
//! root and is navigated through cheap, lifetime-bound handles.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod cache;
mod green;
/// Structural search by S-expression patterns.
pub mod query;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;

/// Incremental builder for constructing a `GreenNode`.
pub use builder::Builder;
/// Interner shared by builders.
pub use cache::NodeCache;
/// Position-independent tree storage.
pub use green::{GreenElement, GreenNode, GreenToken, GreenTrivia};
/// Primary syntax tree API types and adapters.
pub use syntax::{
    ChildrenWithTokens, NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement, SyntaxNode,
    SyntaxToken, SyntaxTree, TokenAtOffset, WalkEvent, WalkEventWithTokens,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Trivia pieces attached to tokens.
pub use trivia::{TriviaPiece, TriviaPieceKind};
