//! Interpreter for the grammar table.
//!
//! Productions are walked left to right with the set of tokens that may
//! follow the current position (`follow`). When the current token cannot
//! start what the grammar expects, recovery picks one of three outcomes:
//!
//! * deletion: a token within `recovery_lookahead` starts the expected
//!   element before any protected token, so the tokens in between are wrapped
//!   in an `ERROR` node;
//! * insertion: the current token is protected (it belongs to `follow` or to
//!   [`SYNC`]), so a zero-width `MISSING` node stands in for the element;
//! * abandonment: everything up to the next statement keyword becomes an
//!   `ERROR` node and the enclosing rules unwind to the top level.

use std::fmt;

use dql_yellow::SyntaxKind::{self, *};
use dql_yellow::SyntaxSet;
use text_size::TextRange;

use crate::{Checkpoint, Segment};
use crate::grammar::{
    Alternative, Associativity, EXPRESSION_CONTINUATION, FIELD_NAME, Grammar, Guard, IDENT_LIKE,
    Precedence, Production, Rule, STATEMENT_START, SYNC, Symbol, Tail,
};
use crate::parser::{CompletedMarker, Marker, Parser};

enum Recovery {
    /// The current token starts the expected element.
    Ready,
    Missing,
    Abandoned,
}

/// What a diagnostic talks about.
#[derive(Clone, Copy)]
enum Label<'a> {
    Kind(SyntaxKind),
    Text(&'a str),
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Label::Text(text) => f.write_str(text),
            Label::Kind(kind) => match kind.text() {
                Some(text) => write!(f, "`{text}`"),
                None => f.write_str(match kind {
                    IDENT => "identifier",
                    INT_NUMBER | FLOAT_NUMBER => "number",
                    STRING => "string",
                    NAMED_PARAMETER | POSITIONAL_PARAMETER => "input parameter",
                    EOF => "end of input",
                    _ => "invalid token",
                }),
            },
        }
    }
}

/// Where `stop` is asked whether to hand over to old subtrees.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Boundary {
    /// Before a top-level segment.
    Segment,
    /// Before `symbol` in the body of the top-level statement `production`,
    /// right after a checkpoint was recorded.
    Clause { production: &'static Production, symbol: usize },
}

/// Nesting depth of the clauses of a top-level statement: one level for
/// `Statement` and one for the production it selects.
const CLAUSE_DEPTH: u32 = 2;

/// Parses top-level segments until end of input, or until `stop` returns
/// `true` at a boundary. Returns whether `stop` ended the loop.
///
/// When `stop` ends a statement early it has spliced in the rest of it, and
/// the statement's segment is recorded up to the boundary.
pub(crate) fn source_file(
    p: &mut Parser<'_>,
    segments: &mut Vec<Segment>,
    mut stop: impl FnMut(&mut Parser<'_>, Boundary) -> bool,
) -> bool {
    loop {
        if p.at(EOF) {
            return false;
        }
        if stop(p, Boundary::Segment) {
            return true;
        }

        let start = p.current_start();
        let diagnostics = p.diagnostics_len();
        let mut checkpoints = Vec::new();
        let stopped = segment(p, &mut checkpoints, &mut stop);
        let end = p.current_start();
        segments.push(Segment {
            range: TextRange::new(start, end),
            examined_end: p.examined_end(),
            diagnostics: diagnostics..p.diagnostics_len(),
            checkpoints,
        });
        if stopped {
            return true;
        }
    }
}

/// One statement, or a run of tokens that cannot start one.
fn segment(
    p: &mut Parser<'_>,
    checkpoints: &mut Vec<Checkpoint>,
    stop: &mut impl FnMut(&mut Parser<'_>, Boundary) -> bool,
) -> bool {
    let mut stopped = false;
    if p.at_any(&STATEMENT_START) {
        match select_statement(p) {
            Some(production) => stopped = statement(p, production, checkpoints, stop),
            None => rule(p, Rule::Statement, &STATEMENT_START.with(EOF)),
        }
    } else {
        let m = p.start();
        let start = p.nth_token(0).kind_range.start();
        while !p.at_any(&STATEMENT_START) && !p.at(EOF) {
            p.bump();
        }
        let range = TextRange::new(start, p.missing_range().end());
        p.error("expected SELECT, UPDATE or DELETE statement", range);
        m.complete(p, ERROR);
    }

    p.unwinding = false;
    p.depth = 0;
    stopped
}

/// The productions `Statement` chooses between, with the alternative
/// selecting each.
fn statements() -> impl Iterator<Item = (&'static Alternative, &'static Production)> {
    let grammar = Grammar::get();
    let alternatives: &'static [Alternative] = match grammar.rule_for(Rule::Statement).body {
        [Symbol::Choice(alternatives, _)] => *alternatives,
        _ => &[],
    };
    alternatives.iter().filter_map(move |alt| match alt.body {
        [Symbol::Rule(rule)] => Some((alt, grammar.rule_for(*rule))),
        _ => None,
    })
}

fn select_statement(p: &mut Parser<'_>) -> Option<&'static Production> {
    statements()
        .find(|(alt, _)| guard_matches(p, &alt.guard, alt.body))
        .map(|(_, production)| production)
}

/// The statement production building `kind`.
pub(crate) fn statement_for(kind: SyntaxKind) -> Option<&'static Production> {
    statements()
        .map(|(_, production)| production)
        .find(|production| production.node == Some(kind))
}

/// `Statement` unrolled down to the clauses of `production`, which its
/// choice selected.
fn statement(
    p: &mut Parser<'_>,
    production: &'static Production,
    checkpoints: &mut Vec<Checkpoint>,
    stop: &mut impl FnMut(&mut Parser<'_>, Boundary) -> bool,
) -> bool {
    if !enter(p) || !enter(p) {
        return false;
    }

    let m = p.start();
    clauses(p, m, production, 0, checkpoints, stop)
}

/// Finishes a top-level statement whose symbols before `from` were spliced
/// in after `m` was started, with `p` restored to the checkpoint there.
pub(crate) fn resume_statement(
    p: &mut Parser<'_>,
    m: Marker,
    production: &'static Production,
    from: usize,
    checkpoints: &mut Vec<Checkpoint>,
    mut stop: impl FnMut(&mut Parser<'_>, Boundary) -> bool,
) -> bool {
    p.depth = CLAUSE_DEPTH;
    let stopped = clauses(p, m, production, from, checkpoints, &mut stop);
    p.unwinding = false;
    p.depth = 0;
    stopped
}

/// The body of a top-level statement from symbol `from` on. A checkpoint is
/// recorded after every symbol that consumed input without unwinding, and
/// `stop` may take over at each of them.
fn clauses(
    p: &mut Parser<'_>,
    m: Marker,
    production: &'static Production,
    from: usize,
    checkpoints: &mut Vec<Checkpoint>,
    stop: &mut impl FnMut(&mut Parser<'_>, Boundary) -> bool,
) -> bool {
    let grammar = Grammar::get();
    let symbols = production.body;
    let follow = STATEMENT_START.with(EOF);

    let mut stopped = false;
    for (i, symbol) in symbols.iter().enumerate().skip(from) {
        if p.unwinding {
            break;
        }

        let consumed = p.consumed();
        self::symbol(p, symbol, &grammar.follow_of(&symbols[i + 1..], &follow));
        if p.unwinding || p.consumed() == consumed {
            continue;
        }

        checkpoints.push(p.checkpoint(i + 1));
        if i + 1 < symbols.len() && stop(p, Boundary::Clause { production, symbol: i + 1 }) {
            stopped = true;
            break;
        }
    }

    match production.node {
        Some(kind) => {
            m.complete(p, kind);
        }
        None => m.abandon(p),
    }
    p.depth -= 1;
    stopped
}

fn rule(p: &mut Parser<'_>, rule: Rule, follow: &SyntaxSet) {
    let grammar = Grammar::get();
    let production = grammar.rule_for(rule);

    if !grammar.nullable(rule) {
        match recover(p, grammar.first(rule), Label::Text(production.label), follow) {
            Recovery::Ready => {}
            Recovery::Missing | Recovery::Abandoned => return,
        }
    }

    if !enter(p) {
        return;
    }

    match production.node {
        Some(kind) => {
            let m = p.start();
            sequence(p, production.body, follow);
            m.complete(p, kind);
        }
        None => sequence(p, production.body, follow),
    }

    p.depth -= 1;
}

fn enter(p: &mut Parser<'_>) -> bool {
    if p.depth >= p.config.max_depth {
        abandon(p, "expression nesting is too deep");
        return false;
    }

    p.depth += 1;
    true
}

fn sequence(p: &mut Parser<'_>, symbols: &[Symbol], follow: &SyntaxSet) {
    let grammar = Grammar::get();
    for (i, symbol) in symbols.iter().enumerate() {
        if p.unwinding {
            return;
        }

        let follow = grammar.follow_of(&symbols[i + 1..], follow);
        self::symbol(p, symbol, &follow);
    }
}

fn symbol(p: &mut Parser<'_>, symbol: &Symbol, follow: &SyntaxSet) {
    match *symbol {
        Symbol::Token(kind) => {
            expect(p, &SyntaxSet::from_kind(kind), Label::Kind(kind), follow, None);
        }
        Symbol::OneOf(kinds, label) => expect(p, &kinds, Label::Text(label), follow, None),
        Symbol::Ident => expect(p, &IDENT_LIKE, Label::Kind(IDENT), follow, Some(IDENT)),
        Symbol::FieldName => {
            expect(p, &FIELD_NAME, Label::Text("field name"), follow, Some(IDENT));
        }
        Symbol::Rule(rule) => self::rule(p, rule, follow),
        Symbol::Optional(guard, body) => {
            if guard_matches(p, &guard, body) {
                sequence(p, body, follow);
            }
        }
        Symbol::Repeat(guard, body) => {
            let inner = Grammar::get().first_of_sequence(body).0.union(follow);
            while !p.unwinding && guard_matches(p, &guard, body) {
                let consumed = p.consumed();
                sequence(p, body, &inner);
                if p.consumed() == consumed {
                    break;
                }
            }
        }
        Symbol::SeparatedBy(body, separator) => {
            let inner = follow.with(separator);
            sequence(p, body, &inner);
            while !p.unwinding && p.at(separator) {
                p.bump();
                sequence(p, body, &inner);
            }
        }
        Symbol::Choice(alternatives, label) => choice(p, alternatives, label, follow),
        Symbol::Expression(precedence) => expression(p, precedence, follow),
    }
}

fn expect(
    p: &mut Parser<'_>,
    kinds: &SyntaxSet,
    label: Label<'_>,
    follow: &SyntaxSet,
    remap: Option<SyntaxKind>,
) {
    if let Recovery::Ready = recover(p, kinds, label, follow) {
        match remap {
            Some(kind) if !p.at(kind) => p.bump_remap(kind),
            _ => p.bump(),
        }
    }
}

fn guard_matches(p: &mut Parser<'_>, guard: &Guard, body: &[Symbol]) -> bool {
    match *guard {
        Guard::First => {
            let kind = p.current();
            Grammar::get().first_of_sequence(body).0.contains(kind)
        }
        Guard::Kinds(kinds) => p.at_any(&kinds),
        Guard::Peek2(first, second) => first.contains(p.nth(0)) && second.contains(p.nth(1)),
        Guard::Any(guards) => guards.iter().any(|guard| guard_matches(p, guard, body)),
    }
}

fn select(p: &mut Parser<'_>, alternatives: &'static [Alternative]) -> Option<&'static Alternative> {
    alternatives.iter().find(|alt| guard_matches(p, &alt.guard, alt.body))
}

fn choice(
    p: &mut Parser<'_>,
    alternatives: &'static [Alternative],
    label: &str,
    follow: &SyntaxSet,
) {
    if let Some(alt) = select(p, alternatives) {
        sequence(p, alt.body, follow);
        return;
    }

    let grammar = Grammar::get();
    let first = alternatives
        .iter()
        .fold(SyntaxSet::EMPTY, |first, alt| first.union(&grammar.first_of_sequence(alt.body).0));

    if let Recovery::Ready = recover(p, &first, Label::Text(label), follow) {
        match select(p, alternatives) {
            Some(alt) => sequence(p, alt.body, follow),
            None => p.missing(label),
        }
    }
}

fn recover(
    p: &mut Parser<'_>,
    first: &SyntaxSet,
    expected: Label<'_>,
    follow: &SyntaxSet,
) -> Recovery {
    if p.unwinding {
        return Recovery::Abandoned;
    }

    let current = p.current();
    if first.contains(current) {
        return Recovery::Ready;
    }

    let protected = follow.union(&SYNC);
    if protected.contains(current) {
        p.missing(expected);
        return Recovery::Missing;
    }

    for n in 1..=p.config.recovery_lookahead {
        let kind = p.nth(n);
        if first.contains(kind) {
            skip(p, n, expected);
            return Recovery::Ready;
        }
        if protected.contains(kind) {
            break;
        }
    }

    abandon(p, &format!("expected {expected}"));
    Recovery::Abandoned
}

/// Wraps the next `n` tokens in an `ERROR` node.
fn skip(p: &mut Parser<'_>, n: usize, expected: Label<'_>) {
    let found = Label::Kind(p.current());
    let start = p.nth_token(0).kind_range.start();

    let m = p.start();
    for _ in 0..n {
        p.bump();
    }
    let range = TextRange::new(start, p.missing_range().end());
    p.error(format!("unexpected {found}, expected {expected}"), range);
    m.complete(p, ERROR);
}

/// Wraps everything up to the next statement keyword in an `ERROR` node and
/// starts unwinding.
fn abandon(p: &mut Parser<'_>, message: &str) {
    let start = p.nth_token(0).kind_range;
    let consumed = p.consumed();

    let m = p.start();
    while !p.at_any(&STATEMENT_START) && !p.at(EOF) {
        p.bump();
    }

    if p.consumed() == consumed {
        p.error(message, start);
        m.abandon(p);
    } else {
        let range = TextRange::new(start.start(), p.missing_range().end());
        p.error(message, range);
        m.complete(p, ERROR);
    }

    p.unwinding = true;
}

fn expression(p: &mut Parser<'_>, min: Precedence, follow: &SyntaxSet) {
    let first = Grammar::get().expression_first(min);
    match recover(p, &first, Label::Text("expression"), follow) {
        Recovery::Ready => {}
        Recovery::Missing | Recovery::Abandoned => return,
    }

    if !enter(p) {
        return;
    }

    let follow = follow.union(&EXPRESSION_CONTINUATION);
    climb(p, min, &follow);
    p.depth -= 1;
}

/// Precedence climbing over the operator and tail tables. The left operand
/// is wrapped after the fact with `precede`.
fn climb(p: &mut Parser<'_>, min: Precedence, follow: &SyntaxSet) {
    let grammar = Grammar::get();
    let Some((mut lhs, mut lhs_precedence)) = prefix(p, min, follow) else {
        return;
    };

    while !p.unwinding {
        if let Some(operator) = grammar.operator(p.current()) {
            if operator.precedence < min || lhs_precedence < operator.precedence {
                break;
            }

            let m = lhs.precede(p);
            p.bump();
            let rhs = match operator.associativity {
                Associativity::Left => operator.precedence.next(),
                Associativity::Right => operator.precedence,
            };
            expression(p, rhs, follow);
            lhs = m.complete(p, operator.node);
            lhs_precedence = operator.precedence;
            continue;
        }

        if min > Precedence::Comparison || lhs_precedence <= Precedence::Comparison {
            break;
        }
        let Some(tail) = find_tail(p) else {
            break;
        };

        let m = lhs.precede(p);
        if p.at(NOT_KW) {
            p.bump();
        }
        p.bump();
        sequence(p, tail.body, follow);
        lhs = m.complete(p, tail.node);
        lhs_precedence = Precedence::Comparison;
    }
}

fn prefix(
    p: &mut Parser<'_>,
    min: Precedence,
    follow: &SyntaxSet,
) -> Option<(CompletedMarker, Precedence)> {
    match p.current() {
        NOT_KW if min <= Precedence::Not => {
            let m = p.start();
            p.bump();
            expression(p, Precedence::Comparison, follow);
            Some((m.complete(p, NOT_EXPRESSION), Precedence::Not))
        }
        PLUS | MINUS => {
            let m = p.start();
            p.bump();
            expression(p, Precedence::Unary, follow);
            Some((m.complete(p, UNARY_EXPRESSION), Precedence::Unary))
        }
        _ => {
            let pos = p.events_len();
            rule(p, Rule::Primary, follow);
            p.completed_at(pos).map(|m| (m, Precedence::Unary))
        }
    }
}

/// The tail continuing at the current token, looking past an optional `NOT`
/// before the trigger and after it.
fn find_tail(p: &mut Parser<'_>) -> Option<&'static Tail> {
    let (negated, trigger) = match p.current() {
        NOT_KW => (true, p.nth(1)),
        kind => (false, kind),
    };
    let after = if negated { 2 } else { 1 };
    let discriminant = match p.nth(after) {
        NOT_KW => p.nth(after + 1),
        kind => kind,
    };

    let mut fallback = None;
    let candidates = Grammar::get()
        .tails()
        .iter()
        .filter(|tail| tail.trigger.contains(trigger) && (tail.negatable || !negated));
    for tail in candidates {
        match tail.discriminant {
            None => return Some(tail),
            Some(kind) if kind == discriminant => return Some(tail),
            Some(_) => {
                fallback.get_or_insert(tail);
            }
        }
    }
    fallback
}
