//! Error-tolerant, incremental parser for the Doctrine Query Language.
//!
//! [`parse`] never fails: malformed input still yields a tree that covers
//! every byte of the text, with `ERROR` and `MISSING` nodes where recovery
//! kicked in and a diagnostic for each of them.

mod edit;
mod engine;
pub mod grammar;
mod parser;
mod reparse;

use std::ops::Range;

pub use dql_errors::{Diagnostic, DiagnosticKind, InvariantViolation};
use dql_tokenizer::Tokenizer;
pub use dql_yellow::{NodeCache, SyntaxNode, SyntaxTree};
use dql_yellow::{NodeOrToken, SyntaxKind};
use text_size::{TextRange, TextSize};

pub use crate::edit::{InputEdit, Point};
use crate::parser::Parser;
pub use crate::reparse::{reparse, reparse_with};

/// Knobs of the recovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// How many tokens past the current one deletion recovery may look for
    /// the expected element.
    pub recovery_lookahead: usize,
    /// Deepest nesting of rules and expressions before the rest of the
    /// statement is given up.
    pub max_depth: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { recovery_lookahead: 3, max_depth: 256 }
    }
}

/// A top-level statement or error region, the unit of incremental reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub(crate) range: TextRange,
    /// Exclusive end of the bytes the tokenizer looked at while the segment
    /// was parsed, lookahead included.
    pub(crate) examined_end: TextSize,
    /// Indices of the diagnostics reported for the segment.
    pub(crate) diagnostics: Range<usize>,
    /// Clause boundaries of a statement, in order.
    pub(crate) checkpoints: Vec<Checkpoint>,
}

/// The state between two clauses of a top-level statement, the unit of
/// reuse inside a segment. Nothing else carries over from one clause to the
/// next, so parsing can stop or restart at any checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    /// Index of the next symbol in the body of the statement production.
    pub(crate) symbol: usize,
    /// Start of the next token, the end of the clause before.
    pub(crate) offset: TextSize,
    pub(crate) examined_end: TextSize,
    /// Number of diagnostics reported up to here.
    pub(crate) diagnostics: usize,
    /// Range of the last consumed token, where a diagnostic about a missing
    /// clause right after the checkpoint points.
    pub(crate) last_range: TextRange,
}

/// The result of parsing: a tree that always exists plus what went wrong.
#[derive(Debug, Clone)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
    segments: Vec<Segment>,
    config: ParserConfig,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        self.tree.root()
    }

    pub fn text(&self) -> &str {
        self.tree.text()
    }

    /// Diagnostics in the order they were reported.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn error_ranges(&self) -> impl Iterator<Item = TextRange> + '_ {
        self.diagnostics.iter().map(Diagnostic::range)
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Re-parses after `edit` turned the text of `self` into `new_text`.
    pub fn reparse(&self, new_text: &str, edit: &InputEdit) -> Self {
        reparse(self, new_text, edit)
    }

    pub fn debug_dump(&self) -> String {
        self.tree.debug_dump()
    }

    /// Checks the structural guarantees of the tree: tokens are contiguous
    /// and cover the text, only `EOF` is zero-width, `MISSING` nodes are
    /// empty, and the tree text is the source text.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let root = self.root();
        let len = TextSize::of(self.text());
        let mut covered = TextSize::new(0);

        for element in root.descendants_with_tokens() {
            match element {
                NodeOrToken::Node(node) => {
                    if node.is_missing() && !node.text_range().is_empty() {
                        return Err(InvariantViolation::NonEmptyMissing {
                            range: node.text_range(),
                        });
                    }
                }
                NodeOrToken::Token(token) => {
                    let range = token.text_range();
                    if range.start() != covered {
                        return Err(InvariantViolation::Discontiguous {
                            kind: token.kind().name(),
                            range,
                            expected: covered,
                        });
                    }
                    if range.is_empty() && token.kind() != SyntaxKind::EOF {
                        return Err(InvariantViolation::ZeroWidthToken {
                            kind: token.kind().name(),
                            offset: range.start(),
                        });
                    }
                    covered = range.end();
                }
            }
        }

        if covered != len {
            return Err(InvariantViolation::Uncovered { covered, len });
        }
        if self.tree.green().to_string() != self.text() {
            return Err(InvariantViolation::TextMismatch);
        }

        Ok(())
    }
}

pub fn parse(text: &str) -> Parse {
    parse_with(text, &ParserConfig::default(), &mut NodeCache::new())
}

pub fn parse_with(text: &str, config: &ParserConfig, cache: &mut NodeCache) -> Parse {
    let mut p = Parser::new(Tokenizer::new(text), *config);
    let mut segments = Vec::new();

    let m = p.start();
    engine::source_file(&mut p, &mut segments, |_, _| false);
    p.bump_eof();
    m.complete(&mut p, SyntaxKind::SOURCE_FILE);

    let (green, diagnostics) = p.finish(text, cache);
    Parse { tree: SyntaxTree::new(text, green), diagnostics, segments, config: *config }
}
