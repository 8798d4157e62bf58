use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;
use text_size::TextSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Malformed input found by the tokenizer.
    Lex,
    /// Input that does not fit the grammar.
    Syntax,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn lex(message: impl Into<String>, range: TextRange) -> Self {
        Self { kind: DiagnosticKind::Lex, message: message.into(), range }
    }

    pub fn syntax(message: impl Into<String>, range: TextRange) -> Self {
        Self { kind: DiagnosticKind::Syntax, message: message.into(), range }
    }

    pub fn with_range(self, range: TextRange) -> Self {
        Self { range, ..self }
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

/// A tree that breaks the structural guarantees of the parser.
///
/// Never produced for any input by a correct parser; seeing one is a bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("token {kind} at {range:?} does not start where the previous token ended ({expected:?})")]
    Discontiguous { kind: &'static str, range: TextRange, expected: TextSize },
    #[error("tokens end at {covered:?} but the text is {len:?} bytes long")]
    Uncovered { covered: TextSize, len: TextSize },
    #[error("zero-width token {kind} at {offset:?}")]
    ZeroWidthToken { kind: &'static str, offset: TextSize },
    #[error("missing node at {range:?} is not empty")]
    NonEmptyMissing { range: TextRange },
    #[error("tree text differs from the source text")]
    TextMismatch,
}
