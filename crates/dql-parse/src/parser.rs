use std::collections::VecDeque;
use std::fmt;

use dql_errors::Diagnostic;
use dql_tokenizer::{Token, Tokenizer};
use dql_yellow::{Builder, GreenElement, GreenNode, NodeCache, SyntaxKind, SyntaxSet};
use drop_bomb::DropBomb;
use text_size::{TextRange, TextSize};

use crate::{Checkpoint, ParserConfig};

pub(crate) struct Parser<'t> {
    tokenizer: Tokenizer<'t>,
    /// Tokens pulled from the tokenizer but not consumed yet, current first.
    lookahead: VecDeque<Token>,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    pub(crate) config: ParserConfig,
    /// Set when recovery gave up on a construct; every enclosing rule returns
    /// without consuming until the top level clears it.
    pub(crate) unwinding: bool,
    pub(crate) depth: u32,
    last_range: Option<TextRange>,
    consumed: usize,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokenizer: Tokenizer<'t>, config: ParserConfig) -> Self {
        Self {
            tokenizer,
            lookahead: VecDeque::with_capacity(4),
            events: Vec::new(),
            diagnostics: Vec::new(),
            config,
            unwinding: false,
            depth: 0,
            last_range: None,
            consumed: 0,
        }
    }

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n {
            if self.lookahead.back().is_some_and(|token| token.kind == SyntaxKind::EOF) {
                break;
            }
            let token = self.tokenizer.next_token();
            self.lookahead.push_back(token);
        }
    }

    /// The `n`-th token from the current one; `EOF` past the end.
    pub(crate) fn nth_token(&mut self, n: usize) -> &Token {
        self.fill(n);
        let index = n.min(self.lookahead.len() - 1);
        &self.lookahead[index]
    }

    pub(crate) fn nth(&mut self, n: usize) -> SyntaxKind {
        self.nth_token(n).kind
    }

    pub(crate) fn current(&mut self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&mut self, kinds: &SyntaxSet) -> bool {
        let kind = self.current();
        kinds.contains(kind)
    }

    /// Consumes the current token. `EOF` is never consumed here.
    pub(crate) fn bump(&mut self) {
        self.bump_as(None);
    }

    /// Consumes the current token under another kind, used for soft keywords
    /// in identifier position.
    pub(crate) fn bump_remap(&mut self, kind: SyntaxKind) {
        self.bump_as(Some(kind));
    }

    fn bump_as(&mut self, kind: Option<SyntaxKind>) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        let Some(mut token) = self.lookahead.pop_front() else {
            return;
        };
        if let Some(error) = token.error {
            self.diagnostics.push(Diagnostic::lex(error.to_string(), token.kind_range));
        }
        if let Some(kind) = kind {
            token.kind = kind;
        }

        self.last_range = Some(token.kind_range);
        self.consumed += 1;
        self.events.push(Event::Token(token));
    }

    pub(crate) fn bump_eof(&mut self) {
        self.fill(0);
        if let Some(token) = self.lookahead.pop_front() {
            debug_assert_eq!(token.kind, SyntaxKind::EOF);
            self.events.push(Event::Token(token));
        }
    }

    /// Number of tokens consumed so far, used to detect lack of progress.
    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }

    /// Start of the current token including its leading trivia.
    pub(crate) fn current_start(&mut self) -> TextSize {
        self.nth_token(0).full_range().start()
    }

    pub(crate) fn current_has_leading_trivia(&mut self) -> bool {
        !self.nth_token(0).leading.is_empty()
    }

    pub(crate) fn examined_end(&self) -> TextSize {
        self.tokenizer.examined_end()
    }

    pub(crate) fn diagnostics_len(&self) -> usize {
        self.diagnostics.len()
    }

    /// The clause boundary at the current token, before `symbol`.
    pub(crate) fn checkpoint(&mut self, symbol: usize) -> Checkpoint {
        let offset = self.current_start();
        Checkpoint {
            symbol,
            offset,
            examined_end: self.examined_end(),
            diagnostics: self.diagnostics.len(),
            last_range: self.missing_range(),
        }
    }

    /// Picks up after tokens that were spliced in rather than consumed, the
    /// last of them at `last_range`.
    pub(crate) fn restore(&mut self, last_range: TextRange) {
        self.last_range = Some(last_range);
    }

    /// Range a diagnostic about something missing points at: the last
    /// consumed token, or the current one at the very start.
    pub(crate) fn missing_range(&mut self) -> TextRange {
        match self.last_range {
            Some(range) => range,
            None => self.nth_token(0).kind_range,
        }
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn error(&mut self, message: impl Into<String>, range: TextRange) {
        self.diagnostics.push(Diagnostic::syntax(message, range));
    }

    /// Inserts a zero-width `MISSING` node and reports what was expected.
    pub(crate) fn missing(&mut self, label: impl fmt::Display) {
        let range = self.missing_range();
        self.error(format!("expected {label}"), range);
        let m = self.start();
        m.complete(self, SyntaxKind::MISSING);
    }

    /// Splices an already built subtree into the output.
    pub(crate) fn reuse(&mut self, element: GreenElement) {
        self.events.push(Event::Reuse(element));
    }

    /// A completed marker for a node started at `pos`, if one was started.
    pub(crate) fn completed_at(&self, pos: usize) -> Option<CompletedMarker> {
        match self.events.get(pos) {
            Some(Event::Start { kind, .. }) if *kind != SyntaxKind::TOMBSTONE => {
                Some(CompletedMarker::new(pos as u32))
            }
            _ => None,
        }
    }

    pub(crate) fn events_len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn finish(
        self,
        text: &str,
        cache: &mut NodeCache,
    ) -> (GreenNode, Vec<Diagnostic>) {
        let Parser { mut events, diagnostics, .. } = self;
        let mut builder = Builder::new(text, cache);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                }
                Event::Token(Token { leading, kind, kind_range, trailing, .. }) => {
                    builder.token(leading, kind, kind_range, trailing);
                }
                Event::Reuse(element) => {
                    builder.reuse(element);
                }
            }
        }

        (builder.finish(), diagnostics)
    }
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Reuse(GreenElement),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Self::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Self {
        Self { position: pos, bomb: DropBomb::new("Marker must be either completed or abandoned") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }

    /// Drops the marker without creating a node. A trailing start event is
    /// removed, an inner one is left as a tombstone.
    pub(crate) fn abandon(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();

        let idx = self.position as usize;
        if idx == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None }) => (),
                _ => unreachable!(),
            }
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        Self { pos }
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
