//! Incremental re-parsing by top-level segment and clause.
//!
//! Every top-level statement or error region is parsed from a clean state,
//! so its subtree depends only on the bytes the tokenizer examined while it
//! was parsed. The same holds between two clauses of a statement, where the
//! parser leaves a [`Checkpoint`]. Segments and clauses that ended their
//! examination before the edit are kept as they are. Parsing restarts after
//! them and stops as soon as it reaches the shifted position of an old
//! segment or checkpoint past the edit; from there the old subtrees are
//! spliced back in by reference.

use dql_tokenizer::Tokenizer;
use dql_yellow::{GreenElement, GreenNode, NodeCache, SyntaxKind, SyntaxTree};
use text_size::{TextRange, TextSize};

use crate::engine::{self, Boundary};
use crate::grammar::Production;
use crate::parser::Parser;
use crate::{Checkpoint, InputEdit, Parse, Segment, parse_with};

/// Re-parses `new_text`, produced from the text of `old` by `edit`.
pub fn reparse(old: &Parse, new_text: &str, edit: &InputEdit) -> Parse {
    reparse_with(old, new_text, edit, &mut NodeCache::new())
}

pub fn reparse_with(
    old: &Parse,
    new_text: &str,
    edit: &InputEdit,
    cache: &mut NodeCache,
) -> Parse {
    let config = old.config;

    if !edit.is_consistent(old.text(), new_text) {
        tracing::warn!(
            start = edit.start_byte,
            old_end = edit.old_end_byte,
            new_end = edit.new_end_byte,
            old_len = old.text().len(),
            new_len = new_text.len(),
            "edit does not match the texts, parsing from scratch"
        );
        return parse_with(new_text, &config, cache);
    }

    let children = old.tree.green().children();
    if children.len() != old.segments.len() + 1 {
        tracing::warn!(
            children = children.len(),
            segments = old.segments.len(),
            "segments do not line up with the tree, parsing from scratch"
        );
        return parse_with(new_text, &config, cache);
    }

    let start = size(edit.start_byte);
    let delta = Delta { old_end: size(edit.old_end_byte), new_end: size(edit.new_end_byte) };

    let reused = old.segments.iter().take_while(|segment| segment.examined_end <= start).count();
    let prefix = kept_clauses(old, reused, start);
    let (restart, prefix_diagnostics) = match (&prefix, reused) {
        (Some(prefix), _) => (prefix.checkpoint.offset, prefix.checkpoint.diagnostics),
        (None, 0) => (TextSize::new(0), 0),
        (None, n) => (old.segments[n - 1].range.end(), old.segments[n - 1].diagnostics.end),
    };

    let mut p = Parser::new(Tokenizer::new_at(new_text, restart), config);
    let m = p.start();
    for child in &children[..reused] {
        p.reuse(child.clone());
    }

    let old_leading_trivia = old
        .tree
        .root()
        .first_token()
        .is_some_and(|token| !token.leading_trivia().is_empty());

    let mut handover = None;
    let mut stop = |p: &mut Parser<'_>, boundary: Boundary| {
        let pos = p.current_start();
        if pos < delta.new_end {
            return false;
        }

        let old_pos = pos - delta.new_end + delta.old_end;
        handover = match boundary {
            Boundary::Segment => {
                let next = old.segments.partition_point(|segment| segment.range.start() < old_pos);
                let synced = old.segments.get(next).is_some_and(|segment| {
                    segment.range.start() == old_pos
                        && !p.current_has_leading_trivia()
                        && !(next == 0 && old_leading_trivia)
                });
                synced.then_some(Handover::Segment(next))
            }
            Boundary::Clause { production, symbol } => {
                sync_clause(old, p, delta, production, symbol, old_pos)
            }
        };
        handover.is_some()
    };

    let mut all_segments = old.segments[..reused].to_vec();
    let mut stopped = false;
    if let Some(prefix) = &prefix {
        let old_segment = &old.segments[reused];
        let statement = p.start();
        for child in &prefix.node.children()[..prefix.children] {
            p.reuse(child.clone());
        }
        p.restore(prefix.checkpoint.last_range);

        let mut checkpoints = Vec::new();
        stopped = engine::resume_statement(
            &mut p,
            statement,
            prefix.production,
            prefix.checkpoint.symbol,
            &mut checkpoints,
            &mut stop,
        );

        let mut segment = Segment {
            range: TextRange::new(old_segment.range.start(), p.current_start()),
            examined_end: p.examined_end().max(prefix.checkpoint.examined_end),
            diagnostics: 0..p.diagnostics_len(),
            checkpoints,
        };
        offset_diagnostics(&mut segment, prefix_diagnostics);
        segment.diagnostics.start = old_segment.diagnostics.start;
        let mut kept = old_segment.checkpoints[..=prefix.index].to_vec();
        kept.append(&mut segment.checkpoints);
        segment.checkpoints = kept;
        all_segments.push(segment);
    }
    if !stopped {
        let mut segments = Vec::new();
        stopped = engine::source_file(&mut p, &mut segments, &mut stop);
        for mut segment in segments {
            offset_diagnostics(&mut segment, prefix_diagnostics);
            all_segments.push(segment);
        }
    }

    let handover = if stopped { handover } else { None };
    match handover {
        Some(Handover::Segment(from)) => {
            for child in &children[from..] {
                p.reuse(child.clone());
            }
        }
        Some(Handover::Clause { segment, .. }) => {
            for child in &children[segment + 1..] {
                p.reuse(child.clone());
            }
        }
        None => p.bump_eof(),
    }
    m.complete(&mut p, SyntaxKind::SOURCE_FILE);

    let examined_end = p.examined_end();
    let (green, fresh) = p.finish(new_text, cache);
    let mut diagnostics = old.diagnostics[..prefix_diagnostics].to_vec();
    diagnostics.extend(fresh);

    if let Some(handover) = handover {
        let (suffix_diagnostics, suffix_segments) = match handover {
            Handover::Segment(from) => (old.segments[from].diagnostics.start, from),
            Handover::Clause { segment, checkpoint } => {
                (old.segments[segment].checkpoints[checkpoint].diagnostics, segment + 1)
            }
        };
        let shift = Shift {
            delta,
            examined_end,
            from: suffix_diagnostics,
            to: diagnostics.len(),
        };
        diagnostics.extend(
            old.diagnostics[suffix_diagnostics..]
                .iter()
                .map(|diagnostic| diagnostic.clone().with_range(delta.range(diagnostic.range()))),
        );

        if let Handover::Clause { segment, checkpoint } = handover {
            let old_segment = &old.segments[segment];
            if let Some(last) = all_segments.last_mut() {
                let end = delta.offset(old_segment.range.end());
                last.range = TextRange::new(last.range.start(), end);
                last.examined_end = shift.examined_end(old_segment.examined_end);
                last.diagnostics.end = shift.index(old_segment.diagnostics.end);
                last.checkpoints.extend(
                    old_segment.checkpoints[checkpoint + 1..]
                        .iter()
                        .map(|checkpoint| shift.checkpoint(checkpoint)),
                );
            }
        }
        all_segments.extend(old.segments[suffix_segments..].iter().map(|segment| Segment {
            range: delta.range(segment.range),
            examined_end: shift.examined_end(segment.examined_end),
            diagnostics: shift.index(segment.diagnostics.start)
                ..shift.index(segment.diagnostics.end),
            checkpoints: segment.checkpoints.iter().map(|c| shift.checkpoint(c)).collect(),
        }));
    }

    tracing::debug!(
        reused_prefix = reused,
        reused_clauses = prefix.as_ref().map_or(0, |prefix| prefix.children),
        synced_clause = matches!(handover, Some(Handover::Clause { .. })),
        reused_suffix = match handover {
            Some(Handover::Segment(from)) => old.segments.len() - from,
            Some(Handover::Clause { segment, .. }) => old.segments.len() - segment - 1,
            None => 0,
        },
        "reparsed"
    );

    Parse {
        tree: SyntaxTree::new(new_text, green),
        diagnostics,
        segments: all_segments,
        config,
    }
}

/// Where re-parsing handed over to the old tree.
#[derive(Debug, Clone, Copy)]
enum Handover {
    /// At the start of an old segment.
    Segment(usize),
    /// Inside an old statement, at one of its checkpoints.
    Clause { segment: usize, checkpoint: usize },
}

/// Leading clauses of a damaged statement that survive the edit.
struct KeptClauses<'a> {
    node: &'a GreenNode,
    production: &'static Production,
    /// The last checkpoint before the edit and its index in the segment.
    checkpoint: &'a Checkpoint,
    index: usize,
    /// Number of children of `node` before `checkpoint`.
    children: usize,
}

fn kept_clauses(old: &Parse, segment: usize, start: TextSize) -> Option<KeptClauses<'_>> {
    let old_segment = old.segments.get(segment)?;
    let index = old_segment
        .checkpoints
        .iter()
        .take_while(|checkpoint| checkpoint.examined_end <= start)
        .count()
        .checked_sub(1)?;
    let node = statement_node(old, segment)?;
    let production = engine::statement_for(node.kind())?;
    let checkpoint = &old_segment.checkpoints[index];

    Some(KeptClauses {
        node,
        production,
        checkpoint,
        index,
        children: children_before(node, old_segment.range.start(), checkpoint.offset),
    })
}

/// Hands over to the old statement if its parse went through the same
/// checkpoint as the current one. The rest of its children are spliced in.
fn sync_clause(
    old: &Parse,
    p: &mut Parser<'_>,
    delta: Delta,
    production: &Production,
    symbol: usize,
    old_pos: TextSize,
) -> Option<Handover> {
    // A checkpoint after the last clause sits at the end of its segment.
    let segment = old.segments.partition_point(|segment| segment.range.end() < old_pos);
    let old_segment = old.segments.get(segment)?;
    let node = statement_node(old, segment)?;
    if production.node != Some(node.kind()) {
        return None;
    }

    let index = old_segment
        .checkpoints
        .iter()
        .position(|checkpoint| checkpoint.offset == old_pos && checkpoint.symbol == symbol)?;
    let checkpoint = &old_segment.checkpoints[index];

    // Diagnostics past the checkpoint may point at the last token before it;
    // they are only carried over when that token maps to the current one.
    let last_range = p.missing_range();
    let same_last = checkpoint.last_range.start() < delta.old_end
        || delta.range(checkpoint.last_range) == last_range;
    let shiftable = old.diagnostics[checkpoint.diagnostics..old_segment.diagnostics.end]
        .iter()
        .all(|diagnostic| diagnostic.range().start() >= delta.old_end);
    if !same_last || !shiftable {
        return None;
    }

    let split = children_before(node, old_segment.range.start(), old_pos);
    for child in &node.children()[split..] {
        p.reuse(child.clone());
    }
    Some(Handover::Clause { segment, checkpoint: index })
}

/// The subtree of a top-level segment, if it is a node.
fn statement_node(parse: &Parse, segment: usize) -> Option<&GreenNode> {
    match parse.tree.green().children().get(segment)? {
        GreenElement::Node(node) => Some(node),
        GreenElement::Token(_) => None,
    }
}

/// Number of children of `node`, which starts at `start`, that begin before
/// `offset`.
fn children_before(node: &GreenNode, start: TextSize, offset: TextSize) -> usize {
    let mut pos = start;
    node.children()
        .iter()
        .take_while(|child| {
            let before = pos < offset;
            pos += child.text_len();
            before
        })
        .count()
}

/// Moves the diagnostic indices of a freshly parsed segment past `by` kept
/// diagnostics.
fn offset_diagnostics(segment: &mut Segment, by: usize) {
    segment.diagnostics = segment.diagnostics.start + by..segment.diagnostics.end + by;
    for checkpoint in &mut segment.checkpoints {
        checkpoint.diagnostics += by;
    }
}

fn size(offset: usize) -> TextSize {
    TextSize::new(offset as u32)
}

/// Maps offsets at or after the end of an edit from the old text to the new.
#[derive(Clone, Copy)]
struct Delta {
    old_end: TextSize,
    new_end: TextSize,
}

impl Delta {
    fn offset(self, offset: TextSize) -> TextSize {
        offset - self.old_end + self.new_end
    }

    fn range(self, range: TextRange) -> TextRange {
        TextRange::new(self.offset(range.start()), self.offset(range.end()))
    }
}

/// Maps old suffix records into the new parse: offsets by `delta`,
/// diagnostic indices from `from` in the old list to `to` in the new one.
/// Nothing after the handover examined less than the new parse did.
#[derive(Clone, Copy)]
struct Shift {
    delta: Delta,
    examined_end: TextSize,
    from: usize,
    to: usize,
}

impl Shift {
    fn examined_end(self, examined_end: TextSize) -> TextSize {
        self.delta.offset(examined_end).max(self.examined_end)
    }

    fn index(self, index: usize) -> usize {
        index - self.from + self.to
    }

    fn checkpoint(self, checkpoint: &Checkpoint) -> Checkpoint {
        Checkpoint {
            symbol: checkpoint.symbol,
            offset: self.delta.offset(checkpoint.offset),
            examined_end: self.examined_end(checkpoint.examined_end),
            diagnostics: self.index(checkpoint.diagnostics),
            last_range: self.delta.range(checkpoint.last_range),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use super::*;
    use crate::parse;

    fn edit(text: &str, start: usize, old_end: usize, insert: &str) -> (Parse, Parse) {
        let old = parse(text);
        let (new_text, edit) = InputEdit::replace(text, start, old_end, insert);
        let incremental = old.reparse(&new_text, &edit);
        let full = parse(&new_text);

        assert_eq!(incremental.debug_dump(), full.debug_dump());
        assert_eq!(incremental.diagnostics(), full.diagnostics());
        assert_eq!(layout(&incremental), layout(&full));
        incremental.validate().unwrap();
        (old, incremental)
    }

    type Layout = (TextRange, Range<usize>, Vec<(usize, TextSize, usize, TextRange)>);

    /// Segments and checkpoints, without the examined ends: those only have
    /// to cover what was looked at and may be larger after re-parsing.
    fn layout(parse: &Parse) -> Vec<Layout> {
        parse
            .segments
            .iter()
            .map(|segment| {
                let checkpoints = segment
                    .checkpoints
                    .iter()
                    .map(|c| (c.symbol, c.offset, c.diagnostics, c.last_range))
                    .collect();
                (segment.range, segment.diagnostics.clone(), checkpoints)
            })
            .collect()
    }

    fn clause(parse: &Parse, index: usize, kind: SyntaxKind) -> &GreenNode {
        statement(parse, index)
            .children()
            .iter()
            .find_map(|child| match child {
                GreenElement::Node(node) if node.kind() == kind => Some(node),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no {kind:?} in statement {index}"))
    }

    fn statement(parse: &Parse, index: usize) -> &GreenNode {
        match &parse.tree.green().children()[index] {
            GreenElement::Node(node) => node,
            GreenElement::Token(token) => panic!("expected a statement, found {token:?}"),
        }
    }

    #[test]
    fn reuses_prefix_and_suffix() {
        let text = "SELECT u FROM User u\nSELECT a FROM Article a\nDELETE FROM Comment c\n";
        let (old, new) = edit(text, 36, 42, "uthor");

        assert!(statement(&old, 0).ptr_eq(statement(&new, 0)));
        assert!(!statement(&old, 1).ptr_eq(statement(&new, 1)));
        assert!(statement(&old, 2).ptr_eq(statement(&new, 2)));
    }

    #[test]
    fn shifts_suffix_diagnostics() {
        let text = "SELECT u FROM User u\nSELECT FROM\n";
        let (old, new) = edit(text, 7, 8, "user");

        assert_eq!(old.diagnostics().len(), 2);
        assert_eq!(new.diagnostics().len(), 2);
        assert_eq!(new.diagnostics()[0].range(), old.diagnostics()[0].range() + TextSize::new(3));
        assert!(statement(&old, 1).ptr_eq(statement(&new, 1)));
    }

    #[test]
    fn edit_inside_a_statement_merges_segments() {
        let text = "SELECT u FROM User u WHERE u.id = 1 SELECT v FROM User v";
        edit(text, 36, 42, "AND u.age > ");
    }

    #[test]
    fn edit_inside_where_keeps_the_other_clauses() {
        use SyntaxKind::{FROM_CLAUSE, GROUP_BY_CLAUSE, SELECT_CLAUSE, WHERE_CLAUSE};

        let text = "SELECT u.name, u.email, COUNT(p.id) FROM User u \
                    LEFT JOIN u.posts p WITH p.id > 0 WHERE u.age > 18 GROUP BY u.name";
        let at = text.find("18").unwrap();
        let (old, new) = edit(text, at, at + 2, "21");

        for kind in [SELECT_CLAUSE, FROM_CLAUSE, GROUP_BY_CLAUSE] {
            assert!(clause(&old, 0, kind).ptr_eq(clause(&new, 0, kind)), "{kind:?} was rebuilt");
        }
        assert!(!clause(&old, 0, WHERE_CLAUSE).ptr_eq(clause(&new, 0, WHERE_CLAUSE)));
        assert_eq!(new.segments[0].checkpoints.len(), 4);
    }

    #[test]
    fn edit_inside_select_hands_over_at_from() {
        let text = "SELECT u.name FROM User u WHERE u.id = 1\nDELETE FROM Comment c";
        let (old, new) = edit(text, 9, 13, "email");

        assert!(!clause(&old, 0, SyntaxKind::SELECT_CLAUSE)
            .ptr_eq(clause(&new, 0, SyntaxKind::SELECT_CLAUSE)));
        assert!(clause(&old, 0, SyntaxKind::FROM_CLAUSE)
            .ptr_eq(clause(&new, 0, SyntaxKind::FROM_CLAUSE)));
        assert!(clause(&old, 0, SyntaxKind::WHERE_CLAUSE)
            .ptr_eq(clause(&new, 0, SyntaxKind::WHERE_CLAUSE)));
        assert!(statement(&old, 1).ptr_eq(statement(&new, 1)));
    }

    #[test]
    fn clause_handover_shifts_diagnostics() {
        let text = "SELECT u FROM User u WHERE u.id = 1 ORDER BY";
        let (old, new) = edit(text, 34, 35, "100");

        assert_eq!(old.diagnostics().len(), 1);
        assert_eq!(new.diagnostics()[0].range(), old.diagnostics()[0].range() + TextSize::new(2));
        assert!(clause(&old, 0, SyntaxKind::ORDER_BY_CLAUSE)
            .ptr_eq(clause(&new, 0, SyntaxKind::ORDER_BY_CLAUSE)));
    }

    #[test]
    fn diagnostic_on_the_edited_token_blocks_handover() {
        let text = "SELECT u WHERE u.id = 1";
        let (old, new) = edit(text, 7, 8, "uu");

        assert_eq!(new.diagnostics().len(), 1);
        let uu = TextRange::new(TextSize::new(7), TextSize::new(9));
        assert_eq!(new.diagnostics()[0].range(), uu);
        assert!(!clause(&old, 0, SyntaxKind::WHERE_CLAUSE)
            .ptr_eq(clause(&new, 0, SyntaxKind::WHERE_CLAUSE)));
    }

    #[test]
    fn leading_trivia_blocks_reuse() {
        edit("  SELECT u FROM User u", 0, 0, "SELECT a FROM A a ");
        edit("SELECT u FROM User u", 0, 0, "  ");
        edit("SELECT u FROM User u", 0, 0, "SELECT a FROM A a\n");
    }

    #[test]
    fn inconsistent_edit_falls_back() {
        let old = parse("SELECT u FROM User u");
        let bogus = InputEdit {
            start_byte: 30,
            old_end_byte: 31,
            new_end_byte: 2,
            start_point: Default::default(),
            old_end_point: Default::default(),
            new_end_point: Default::default(),
        };
        let new = old.reparse("DELETE FROM User u", &bogus);
        assert_eq!(new.debug_dump(), parse("DELETE FROM User u").debug_dump());
    }
}
