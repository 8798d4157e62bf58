use dql_parse::{InputEdit, Parse, parse};
use dql_yellow::SyntaxKind;
use dql_yellow::ast::{AstNode, Expr, SelectStatement, SourceFile, Statement};

fn select(parse: &Parse) -> SelectStatement<'_> {
    let file = SourceFile::cast(parse.root()).expect("a source file");
    match file.statements().next() {
        Some(Statement::Select(select)) => select,
        other => panic!("expected a SELECT statement, found {other:?}"),
    }
}

#[test]
fn comparison_in_where_clause() {
    let parse = parse("SELECT u FROM User u WHERE u.age > 18");
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());
    parse.validate().unwrap();

    let select = select(&parse);
    let declarations: Vec<_> = select.from_clause().unwrap().declarations().collect();
    assert_eq!(declarations.len(), 1);

    let range = declarations[0].range_variable().unwrap();
    assert_eq!(range.schema_name().unwrap().name(), "User");
    assert_eq!(range.alias().unwrap().name().unwrap().text_trimmed(), "u");

    let Some(Expr::Binary(comparison)) = select.where_clause().unwrap().condition() else {
        panic!("expected a comparison");
    };
    assert_eq!(comparison.syntax().kind(), SyntaxKind::COMPARISON_EXPRESSION);
    assert_eq!(comparison.op().unwrap().kind(), SyntaxKind::GT);

    let Some(Expr::Path(path)) = comparison.lhs() else { panic!("expected a path") };
    assert_eq!(path.variable().unwrap().text_trimmed(), "u");
    let fields: Vec<_> = path.fields().map(|field| field.text_trimmed()).collect();
    assert_eq!(fields, ["age"]);

    let Some(Expr::Literal(literal)) = comparison.rhs() else { panic!("expected a literal") };
    assert_eq!(literal.token().unwrap().text_trimmed(), "18");
}

#[test]
fn truncated_comparison() {
    let text = "SELECT u FROM User u WHERE u.age >";
    let parse = parse(text);
    parse.validate().unwrap();
    assert_eq!(parse.root().text_range().len(), text.len().try_into().unwrap());

    let operator = text.find('>').unwrap();
    let first_error = parse.error_ranges().next().expect("an error");
    assert_eq!(usize::from(first_error.start()), operator);

    let Some(Expr::Binary(comparison)) = select(&parse).where_clause().unwrap().condition() else {
        panic!("expected a comparison");
    };
    assert!(matches!(comparison.rhs(), Some(Expr::Missing(_))));
}

#[test]
fn aggregate_and_group_by() {
    let parse = parse("SELECT COUNT(u.id) FROM User u GROUP BY u.status");
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());

    let select = select(&parse);
    let expression = select.select_clause().unwrap().expressions().next().unwrap();
    let Some(Expr::Aggregate(count)) = expression.expr() else { panic!("expected an aggregate") };
    assert_eq!(count.function().unwrap().kind(), SyntaxKind::COUNT_KW);
    assert!(!count.is_distinct());

    let Some(Expr::Path(argument)) = count.argument() else { panic!("expected a path") };
    assert_eq!(argument.syntax().text_trimmed(), "u.id");

    let items: Vec<_> = select.group_by_clause().unwrap().items().collect();
    assert_eq!(items.len(), 1);
    let Some(Expr::Path(grouped)) = items[0].expr() else { panic!("expected a path") };
    assert_eq!(grouped.syntax().text_trimmed(), "u.status");
}

#[test]
fn insertion_before_literal() {
    let text = "SELECT u FROM User u WHERE u.age > 18";
    let old = parse(text);

    let offset = text.find("18").unwrap();
    let (new_text, edit) = InputEdit::replace(text, offset, offset, "AND u.name = :n");
    assert_eq!(new_text, "SELECT u FROM User u WHERE u.age > AND u.name = :n18");

    let incremental = old.reparse(&new_text, &edit);
    let full = parse(&new_text);
    assert_eq!(incremental.debug_dump(), full.debug_dump());
    assert_eq!(incremental.diagnostics(), full.diagnostics());
    incremental.validate().unwrap();

    let Some(Expr::Binary(and)) = select(&incremental).where_clause().unwrap().condition() else {
        panic!("expected a conjunction");
    };
    assert_eq!(and.syntax().kind(), SyntaxKind::AND_EXPRESSION);
    let Some(Expr::Binary(left)) = and.lhs() else { panic!("expected a comparison") };
    assert!(matches!(left.rhs(), Some(Expr::Missing(_))));
    let Some(Expr::Binary(right)) = and.rhs() else { panic!("expected a comparison") };
    assert!(matches!(right.rhs(), Some(Expr::Parameter(parameter)) if parameter.name() == Some("n18")));
}
