use crate::SyntaxKind::{self, *};
use crate::{NodeOrToken, SyntaxNode, SyntaxSet, SyntaxToken};

pub trait AstNode<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(self) -> SyntaxNode<'a>;
}

macro_rules! ast_nodes {
    ($($name:ident => $kind:ident,)*) => {$(
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> AstNode<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                (syntax.kind() == $kind).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    )*};
}

ast_nodes! {
    SourceFile => SOURCE_FILE,
    SelectStatement => SELECT_STATEMENT,
    UpdateStatement => UPDATE_STATEMENT,
    DeleteStatement => DELETE_STATEMENT,
    SelectClause => SELECT_CLAUSE,
    SelectExpression => SELECT_EXPRESSION,
    ResultAlias => RESULT_ALIAS,
    FromClause => FROM_CLAUSE,
    IdentificationVariableDeclaration => IDENTIFICATION_VARIABLE_DECLARATION,
    RangeVariableDeclaration => RANGE_VARIABLE_DECLARATION,
    AbstractSchemaName => ABSTRACT_SCHEMA_NAME,
    AliasDeclaration => ALIAS_DECLARATION,
    IndexBy => INDEX_BY,
    Join => JOIN,
    JoinAssociationDeclaration => JOIN_ASSOCIATION_DECLARATION,
    JoinCondition => JOIN_CONDITION,
    WhereClause => WHERE_CLAUSE,
    GroupByClause => GROUP_BY_CLAUSE,
    GroupByItem => GROUP_BY_ITEM,
    HavingClause => HAVING_CLAUSE,
    OrderByClause => ORDER_BY_CLAUSE,
    OrderByItem => ORDER_BY_ITEM,
    UpdateClause => UPDATE_CLAUSE,
    UpdateItem => UPDATE_ITEM,
    DeleteClause => DELETE_CLAUSE,
    PathExpression => PATH_EXPRESSION,
    IdentificationVariable => IDENTIFICATION_VARIABLE,
    Literal => LITERAL,
    InputParameter => INPUT_PARAMETER,
    AggregateExpression => AGGREGATE_EXPRESSION,
    FunctionCall => FUNCTION_CALL,
    ParenExpression => PAREN_EXPRESSION,
    Subselect => SUBSELECT,
}

fn child<'a, N: AstNode<'a>>(parent: SyntaxNode<'a>) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<'a, N: AstNode<'a> + 'a>(parent: SyntaxNode<'a>) -> impl Iterator<Item = N> + 'a {
    parent.children().filter_map(N::cast)
}

fn token<'a>(parent: SyntaxNode<'a>, kind: SyntaxKind) -> Option<SyntaxToken<'a>> {
    parent.children_with_tokens().filter_map(NodeOrToken::into_token).find(|token| token.kind() == kind)
}

fn first_token<'a>(parent: SyntaxNode<'a>) -> Option<SyntaxToken<'a>> {
    parent.children_with_tokens().find_map(NodeOrToken::into_token)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    Select(SelectStatement<'a>),
    Update(UpdateStatement<'a>),
    Delete(DeleteStatement<'a>),
}

impl<'a> AstNode<'a> for Statement<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        match syntax.kind() {
            SELECT_STATEMENT => Some(Statement::Select(SelectStatement(syntax))),
            UPDATE_STATEMENT => Some(Statement::Update(UpdateStatement(syntax))),
            DELETE_STATEMENT => Some(Statement::Delete(DeleteStatement(syntax))),
            _ => None,
        }
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Statement::Select(it) => it.0,
            Statement::Update(it) => it.0,
            Statement::Delete(it) => it.0,
        }
    }
}

impl<'a> Statement<'a> {
    pub fn where_clause(self) -> Option<WhereClause<'a>> {
        child(self.syntax())
    }
}

impl<'a> SourceFile<'a> {
    pub fn statements(self) -> impl Iterator<Item = Statement<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> SelectStatement<'a> {
    pub fn select_clause(self) -> Option<SelectClause<'a>> {
        child(self.0)
    }

    pub fn from_clause(self) -> Option<FromClause<'a>> {
        child(self.0)
    }

    pub fn where_clause(self) -> Option<WhereClause<'a>> {
        child(self.0)
    }

    pub fn group_by_clause(self) -> Option<GroupByClause<'a>> {
        child(self.0)
    }

    pub fn having_clause(self) -> Option<HavingClause<'a>> {
        child(self.0)
    }

    pub fn order_by_clause(self) -> Option<OrderByClause<'a>> {
        child(self.0)
    }
}

impl<'a> SelectClause<'a> {
    pub fn is_distinct(self) -> bool {
        token(self.0, DISTINCT_KW).is_some()
    }

    pub fn expressions(self) -> impl Iterator<Item = SelectExpression<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> SelectExpression<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn alias(self) -> Option<ResultAlias<'a>> {
        child(self.0)
    }
}

impl<'a> ResultAlias<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, IDENT)
    }

    pub fn is_hidden(self) -> bool {
        token(self.0, HIDDEN_KW).is_some()
    }
}

impl<'a> FromClause<'a> {
    pub fn declarations(self) -> impl Iterator<Item = IdentificationVariableDeclaration<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> IdentificationVariableDeclaration<'a> {
    pub fn range_variable(self) -> Option<RangeVariableDeclaration<'a>> {
        child(self.0)
    }

    pub fn index_by(self) -> Option<IndexBy<'a>> {
        child(self.0)
    }

    pub fn joins(self) -> impl Iterator<Item = Join<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> RangeVariableDeclaration<'a> {
    pub fn schema_name(self) -> Option<AbstractSchemaName<'a>> {
        child(self.0)
    }

    pub fn alias(self) -> Option<AliasDeclaration<'a>> {
        child(self.0)
    }
}

impl<'a> AbstractSchemaName<'a> {
    /// Fully qualified name as written, e.g. `App\Entity\User`.
    pub fn name(self) -> &'a str {
        self.0.text_trimmed()
    }
}

impl<'a> AliasDeclaration<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        token(self.0, IDENT)
    }
}

impl<'a> IndexBy<'a> {
    pub fn path(self) -> Option<PathExpression<'a>> {
        child(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl<'a> Join<'a> {
    /// `JOIN` alone is an inner join.
    pub fn join_kind(self) -> JoinKind {
        if token(self.0, LEFT_KW).is_some() { JoinKind::Left } else { JoinKind::Inner }
    }

    pub fn association(self) -> Option<JoinAssociationDeclaration<'a>> {
        child(self.0)
    }

    pub fn range_variable(self) -> Option<RangeVariableDeclaration<'a>> {
        child(self.0)
    }

    pub fn condition(self) -> Option<JoinCondition<'a>> {
        child(self.0)
    }
}

impl<'a> JoinAssociationDeclaration<'a> {
    pub fn path(self) -> Option<PathExpression<'a>> {
        child(self.0)
    }

    pub fn alias(self) -> Option<AliasDeclaration<'a>> {
        child(self.0)
    }
}

impl<'a> JoinCondition<'a> {
    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> WhereClause<'a> {
    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> HavingClause<'a> {
    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> GroupByClause<'a> {
    pub fn items(self) -> impl Iterator<Item = GroupByItem<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> GroupByItem<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> OrderByClause<'a> {
    pub fn items(self) -> impl Iterator<Item = OrderByItem<'a>> + 'a {
        children(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl<'a> OrderByItem<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn direction(self) -> Option<Direction> {
        if token(self.0, ASC_KW).is_some() {
            Some(Direction::Asc)
        } else if token(self.0, DESC_KW).is_some() {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

impl<'a> UpdateStatement<'a> {
    pub fn update_clause(self) -> Option<UpdateClause<'a>> {
        child(self.0)
    }

    pub fn where_clause(self) -> Option<WhereClause<'a>> {
        child(self.0)
    }
}

impl<'a> UpdateClause<'a> {
    pub fn schema_name(self) -> Option<AbstractSchemaName<'a>> {
        child(self.0)
    }

    pub fn alias(self) -> Option<AliasDeclaration<'a>> {
        child(self.0)
    }

    pub fn items(self) -> impl Iterator<Item = UpdateItem<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> UpdateItem<'a> {
    pub fn target(self) -> Option<PathExpression<'a>> {
        child(self.0)
    }

    pub fn value(self) -> Option<Expr<'a>> {
        self.0.children().skip(1).find_map(Expr::cast)
    }
}

impl<'a> DeleteStatement<'a> {
    pub fn delete_clause(self) -> Option<DeleteClause<'a>> {
        child(self.0)
    }

    pub fn where_clause(self) -> Option<WhereClause<'a>> {
        child(self.0)
    }
}

impl<'a> DeleteClause<'a> {
    pub fn schema_name(self) -> Option<AbstractSchemaName<'a>> {
        child(self.0)
    }

    pub fn alias(self) -> Option<AliasDeclaration<'a>> {
        child(self.0)
    }
}

const BINARY: SyntaxSet =
    SyntaxSet::new([OR_EXPRESSION, AND_EXPRESSION, BINARY_EXPRESSION, COMPARISON_EXPRESSION]);

const PREDICATES: SyntaxSet = SyntaxSet::new([
    BETWEEN_EXPRESSION,
    LIKE_EXPRESSION,
    IN_EXPRESSION,
    NULL_COMPARISON_EXPRESSION,
    EMPTY_COLLECTION_COMPARISON_EXPRESSION,
    COLLECTION_MEMBER_EXPRESSION,
    INSTANCE_OF_EXPRESSION,
]);

const OTHER_EXPRESSIONS: SyntaxSet = SyntaxSet::new([
    CASE_EXPRESSION,
    SIMPLE_CASE_EXPRESSION,
    COALESCE_EXPRESSION,
    NULLIF_EXPRESSION,
    EXISTS_EXPRESSION,
    QUANTIFIED_EXPRESSION,
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expr<'a> {
    Binary(BinaryExpr<'a>),
    Prefix(PrefixExpr<'a>),
    Predicate(Predicate<'a>),
    Path(PathExpression<'a>),
    Variable(IdentificationVariable<'a>),
    Literal(Literal<'a>),
    Parameter(InputParameter<'a>),
    Aggregate(AggregateExpression<'a>),
    Call(FunctionCall<'a>),
    Paren(ParenExpression<'a>),
    Subselect(Subselect<'a>),
    /// Case, coalesce, nullif, exists and quantified expressions.
    Other(SyntaxNode<'a>),
    /// Placeholder for an expression the parser had to insert.
    Missing(SyntaxNode<'a>),
}

impl<'a> AstNode<'a> for Expr<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        let expr = match syntax.kind() {
            kind if BINARY.contains(kind) => Expr::Binary(BinaryExpr(syntax)),
            NOT_EXPRESSION | UNARY_EXPRESSION => Expr::Prefix(PrefixExpr(syntax)),
            kind if PREDICATES.contains(kind) => Expr::Predicate(Predicate(syntax)),
            PATH_EXPRESSION => Expr::Path(PathExpression(syntax)),
            IDENTIFICATION_VARIABLE => Expr::Variable(IdentificationVariable(syntax)),
            LITERAL => Expr::Literal(Literal(syntax)),
            INPUT_PARAMETER => Expr::Parameter(InputParameter(syntax)),
            AGGREGATE_EXPRESSION => Expr::Aggregate(AggregateExpression(syntax)),
            FUNCTION_CALL => Expr::Call(FunctionCall(syntax)),
            PAREN_EXPRESSION => Expr::Paren(ParenExpression(syntax)),
            SUBSELECT => Expr::Subselect(Subselect(syntax)),
            kind if OTHER_EXPRESSIONS.contains(kind) => Expr::Other(syntax),
            MISSING => Expr::Missing(syntax),
            _ => return None,
        };
        Some(expr)
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Expr::Binary(it) => it.0,
            Expr::Prefix(it) => it.0,
            Expr::Predicate(it) => it.0,
            Expr::Path(it) => it.0,
            Expr::Variable(it) => it.0,
            Expr::Literal(it) => it.0,
            Expr::Parameter(it) => it.0,
            Expr::Aggregate(it) => it.0,
            Expr::Call(it) => it.0,
            Expr::Paren(it) => it.0,
            Expr::Subselect(it) => it.0,
            Expr::Other(it) | Expr::Missing(it) => it,
        }
    }
}

/// `OR`, `AND`, arithmetic and comparison expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryExpr<'a>(SyntaxNode<'a>);

impl<'a> BinaryExpr<'a> {
    pub fn syntax(self) -> SyntaxNode<'a> {
        self.0
    }

    pub fn lhs(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn rhs(self) -> Option<Expr<'a>> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn op(self) -> Option<SyntaxToken<'a>> {
        first_token(self.0)
    }
}

/// `NOT` and unary sign expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixExpr<'a>(SyntaxNode<'a>);

impl<'a> PrefixExpr<'a> {
    pub fn syntax(self) -> SyntaxNode<'a> {
        self.0
    }

    pub fn op(self) -> Option<SyntaxToken<'a>> {
        first_token(self.0)
    }

    pub fn operand(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

/// `BETWEEN`, `LIKE`, `IN`, `IS NULL`, `IS EMPTY`, `MEMBER OF` and
/// `INSTANCE OF` tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predicate<'a>(SyntaxNode<'a>);

impl<'a> Predicate<'a> {
    pub fn syntax(self) -> SyntaxNode<'a> {
        self.0
    }

    pub fn subject(self) -> Option<Expr<'a>> {
        child(self.0)
    }

    pub fn is_negated(self) -> bool {
        token(self.0, NOT_KW).is_some()
    }
}

impl<'a> PathExpression<'a> {
    pub fn variable(self) -> Option<SyntaxToken<'a>> {
        first_token(self.0)
    }

    /// Field names after the variable, in order.
    pub fn fields(self) -> impl Iterator<Item = SyntaxToken<'a>> + 'a {
        self.0
            .children_with_tokens()
            .filter_map(NodeOrToken::into_token)
            .filter(|token| token.kind() == IDENT)
            .skip(1)
    }
}

impl<'a> IdentificationVariable<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        first_token(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    String,
    Boolean,
    Null,
}

impl<'a> Literal<'a> {
    pub fn token(self) -> Option<SyntaxToken<'a>> {
        first_token(self.0)
    }

    pub fn kind(self) -> Option<LiteralKind> {
        let kind = match self.token()?.kind() {
            INT_NUMBER => LiteralKind::Int,
            FLOAT_NUMBER => LiteralKind::Float,
            STRING => LiteralKind::String,
            TRUE_KW | FALSE_KW => LiteralKind::Boolean,
            NULL_KW => LiteralKind::Null,
            _ => return None,
        };
        Some(kind)
    }
}

impl<'a> InputParameter<'a> {
    pub fn is_named(self) -> bool {
        first_token(self.0).is_some_and(|token| token.kind() == NAMED_PARAMETER)
    }

    /// Parameter name or position without the `:` or `?` sigil.
    pub fn name(self) -> Option<&'a str> {
        first_token(self.0).map(|token| &token.text_trimmed()[1..])
    }
}

impl<'a> AggregateExpression<'a> {
    pub fn function(self) -> Option<SyntaxToken<'a>> {
        first_token(self.0)
    }

    pub fn is_distinct(self) -> bool {
        token(self.0, DISTINCT_KW).is_some()
    }

    /// `None` for `COUNT(*)`.
    pub fn argument(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> FunctionCall<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        first_token(self.0)
    }

    pub fn args(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        self.0
            .children()
            .find(|node| node.kind() == ARG_LIST)
            .into_iter()
            .flat_map(|args| args.children().filter_map(Expr::cast))
    }
}

impl<'a> ParenExpression<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        child(self.0)
    }
}

impl<'a> Subselect<'a> {
    pub fn select(self) -> Option<SelectStatement<'a>> {
        child(self.0)
    }
}
