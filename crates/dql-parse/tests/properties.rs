mod common;

use dql_parse::{NodeCache, ParserConfig, parse, parse_with};
use dql_yellow::query::{Pattern, find_enclosing};
use dql_yellow::{SyntaxKind, SyntaxSet};
use text_size::TextSize;

#[test]
fn trees_cover_their_text() {
    for text in common::corpus() {
        let parse = parse(text);
        parse.validate().unwrap_or_else(|err| panic!("{text:?}: {err}"));

        let rebuilt: String = parse.root().tokens().map(|token| token.text()).collect();
        assert_eq!(rebuilt, text);
        assert_eq!(parse.root().to_string(), text);
        assert_eq!(parse.root().kind(), SyntaxKind::SOURCE_FILE);
        assert_eq!(parse.root().last_token().map(|token| token.kind()), Some(SyntaxKind::EOF));
    }
}

#[test]
fn valid_queries_have_no_errors() {
    for text in common::VALID {
        let parse = parse(text);
        assert!(!parse.has_errors(), "{text:?}\n{:?}\n{}", parse.diagnostics(), parse.debug_dump());
        assert!(parse.root().descendants().all(|node| !node.is_error() && !node.is_missing()));
    }
}

#[test]
fn malformed_queries_report_errors_inside_the_text() {
    for text in &common::INVALID[2..] {
        let parse = parse(text);
        assert!(parse.has_errors(), "{text:?}");

        let len = TextSize::of(*text);
        for range in parse.error_ranges() {
            assert!(range.end() <= len, "{text:?}: {range:?}");
        }
    }
}

#[test]
fn empty_input() {
    for text in ["", "   \n\t", "-- only a comment\n"] {
        let parse = parse(text);
        assert!(!parse.has_errors(), "{text:?}: {:?}", parse.diagnostics());
        assert_eq!(parse.root().children().count(), 0);
        assert_eq!(parse.root().tokens().count(), 1);
        parse.validate().unwrap();
    }
}

#[test]
fn parsing_is_deterministic() {
    let mut cache = NodeCache::new();
    let config = ParserConfig::default();

    for text in common::corpus() {
        let first = parse(text);
        let second = parse_with(text, &config, &mut cache);
        let third = parse_with(text, &config, &mut cache);

        assert_eq!(first.debug_dump(), second.debug_dump());
        assert_eq!(second.debug_dump(), third.debug_dump());
        assert_eq!(first.diagnostics(), third.diagnostics());
    }
}

#[test]
fn reparsing_the_tree_text_is_idempotent() {
    for text in common::corpus() {
        let first = parse(text);
        let second = parse(&first.root().to_string());

        assert_eq!(first.debug_dump(), second.debug_dump());
        assert_eq!(first.diagnostics(), second.diagnostics());
    }
}

#[test]
fn one_segment_per_statement() {
    let parse = parse(common::VALID[9]);
    let kinds: Vec<_> = parse.root().children().map(|node| node.kind()).collect();
    assert_eq!(
        kinds,
        [SyntaxKind::SELECT_STATEMENT, SyntaxKind::DELETE_STATEMENT, SyntaxKind::UPDATE_STATEMENT]
    );

    let first = parse.root().first_token().unwrap();
    assert_eq!(first.kind(), SyntaxKind::SELECT_KW);
    assert_eq!(first.leading_trivia().len(), 2);
}

#[test]
fn structural_search() {
    let parse = parse(common::VALID[1]);
    let pattern = Pattern::parse("(join (path_expression))").unwrap();

    let joins = pattern.find_all(parse.root());
    assert_eq!(joins.len(), 1);
    assert_eq!(joins[0].text_trimmed(), "LEFT JOIN u.articles a WITH a.published = TRUE");

    let aggregates = Pattern::parse("(aggregate_expression)").unwrap().find_all(parse.root());
    let texts: Vec<_> = aggregates.iter().map(|node| node.text_trimmed()).collect();
    assert_eq!(texts, ["COUNT(DISTINCT a.id)", "COUNT(a.id)"]);

    let nothing = Pattern::parse("(where_clause (_))").unwrap().find_all(parse.root());
    assert!(nothing.is_empty());
}

#[test]
fn enclosing_nodes() {
    let text = common::VALID[0];
    let parse = parse(text);
    let offset = TextSize::new(text.find("age").unwrap() as u32);

    let path = parse.root().node_at_offset(offset).unwrap();
    assert_eq!(path.kind(), SyntaxKind::PATH_EXPRESSION);
    assert_eq!(path.text_trimmed(), "u.age");

    let kinds = SyntaxSet::new([SyntaxKind::WHERE_CLAUSE, SyntaxKind::SELECT_STATEMENT]);
    let clause = find_enclosing(parse.root(), offset, &kinds).unwrap();
    assert_eq!(clause.kind(), SyntaxKind::WHERE_CLAUSE);

    let statement =
        find_enclosing(parse.root(), TextSize::new(0), &SyntaxSet::from_kind(SyntaxKind::SELECT_STATEMENT));
    assert_eq!(statement.map(|node| node.kind()), Some(SyntaxKind::SELECT_STATEMENT));

    let outside = TextSize::of(text) + TextSize::new(1);
    assert!(find_enclosing(parse.root(), outside, &kinds).is_none());
}
