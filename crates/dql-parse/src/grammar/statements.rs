use dql_yellow::SyntaxKind::*;
use dql_yellow::SyntaxSet;

use super::{Alternative, Guard, IDENT_LIKE, Precedence, Production, Rule as R, Symbol as S};

const AT_SELECT: Guard = Guard::Kinds(SyntaxSet::new([SELECT_KW]));
const AT_UPDATE: Guard = Guard::Kinds(SyntaxSet::new([UPDATE_KW]));
const AT_DELETE: Guard = Guard::Kinds(SyntaxSet::new([DELETE_KW]));
const AT_WHERE: Guard = Guard::Kinds(SyntaxSet::new([WHERE_KW]));
const AT_GROUP: Guard = Guard::Kinds(SyntaxSet::new([GROUP_KW]));
const AT_HAVING: Guard = Guard::Kinds(SyntaxSet::new([HAVING_KW]));
const AT_ORDER: Guard = Guard::Kinds(SyntaxSet::new([ORDER_KW]));
const AT_DISTINCT: Guard = Guard::Kinds(SyntaxSet::new([DISTINCT_KW]));
const AT_PARTIAL: Guard = Guard::Kinds(SyntaxSet::new([PARTIAL_KW]));
const AT_NEW: Guard = Guard::Kinds(SyntaxSet::new([NEW_KW]));
const AT_NAMED: Guard = Guard::Kinds(SyntaxSet::new([NAMED_KW]));
const AT_AS: Guard = Guard::Kinds(SyntaxSet::new([AS_KW]));
const AT_HIDDEN: Guard = Guard::Kinds(SyntaxSet::new([HIDDEN_KW]));
const AT_FROM: Guard = Guard::Kinds(SyntaxSet::new([FROM_KW]));
const AT_INDEX: Guard = Guard::Kinds(SyntaxSet::new([INDEX_KW]));
const AT_JOIN: Guard = Guard::Kinds(SyntaxSet::new([LEFT_KW, INNER_KW, JOIN_KW]));
const AT_LEFT: Guard = Guard::Kinds(SyntaxSet::new([LEFT_KW]));
const AT_OUTER: Guard = Guard::Kinds(SyntaxSet::new([OUTER_KW]));
const AT_INNER: Guard = Guard::Kinds(SyntaxSet::new([INNER_KW]));
const AT_JOIN_CONDITION: Guard = Guard::Kinds(JOIN_CONDITIONS);
const AT_BACKSLASH: Guard = Guard::Kinds(SyntaxSet::new([BACKSLASH]));
const AT_DIRECTION: Guard = Guard::Kinds(DIRECTIONS);
const AT_ASSOCIATION: Guard = Guard::Peek2(IDENT_LIKE, SyntaxSet::new([DOT]));

const JOIN_CONDITIONS: SyntaxSet = SyntaxSet::new([WITH_KW, ON_KW]);
const DIRECTIONS: SyntaxSet = SyntaxSet::new([ASC_KW, DESC_KW]);

pub(super) static PRODUCTIONS: &[Production] = &[
    Production {
        rule: R::Statement,
        node: None,
        label: "SELECT, UPDATE or DELETE statement",
        body: &[S::Choice(
            &[
                Alternative { guard: AT_SELECT, body: &[S::Rule(R::SelectStatement)] },
                Alternative { guard: AT_UPDATE, body: &[S::Rule(R::UpdateStatement)] },
                Alternative { guard: AT_DELETE, body: &[S::Rule(R::DeleteStatement)] },
            ],
            "SELECT, UPDATE or DELETE statement",
        )],
    },
    Production {
        rule: R::SelectStatement,
        node: Some(SELECT_STATEMENT),
        label: "SELECT statement",
        body: &[
            S::Rule(R::SelectClause),
            S::Rule(R::FromClause),
            S::Optional(AT_WHERE, &[S::Rule(R::WhereClause)]),
            S::Optional(AT_GROUP, &[S::Rule(R::GroupByClause)]),
            S::Optional(AT_HAVING, &[S::Rule(R::HavingClause)]),
            S::Optional(AT_ORDER, &[S::Rule(R::OrderByClause)]),
        ],
    },
    Production {
        rule: R::UpdateStatement,
        node: Some(UPDATE_STATEMENT),
        label: "UPDATE statement",
        body: &[S::Rule(R::UpdateClause), S::Optional(AT_WHERE, &[S::Rule(R::WhereClause)])],
    },
    Production {
        rule: R::DeleteStatement,
        node: Some(DELETE_STATEMENT),
        label: "DELETE statement",
        body: &[S::Rule(R::DeleteClause), S::Optional(AT_WHERE, &[S::Rule(R::WhereClause)])],
    },
    Production {
        rule: R::SelectClause,
        node: Some(SELECT_CLAUSE),
        label: "SELECT",
        body: &[
            S::Token(SELECT_KW),
            S::Optional(AT_DISTINCT, &[S::Token(DISTINCT_KW)]),
            S::SeparatedBy(&[S::Rule(R::SelectExpression)], COMMA),
        ],
    },
    Production {
        rule: R::SelectExpression,
        node: Some(SELECT_EXPRESSION),
        label: "select expression",
        body: &[
            S::Choice(
                &[
                    Alternative { guard: AT_PARTIAL, body: &[S::Rule(R::PartialObjectExpression)] },
                    Alternative { guard: AT_NEW, body: &[S::Rule(R::NewObjectExpression)] },
                    Alternative {
                        guard: Guard::First,
                        body: &[S::Expression(Precedence::Additive)],
                    },
                ],
                "select expression",
            ),
            S::Optional(Guard::First, &[S::Rule(R::ResultAlias)]),
        ],
    },
    Production {
        rule: R::ResultAlias,
        node: Some(RESULT_ALIAS),
        label: "result alias",
        body: &[
            S::Optional(AT_AS, &[S::Token(AS_KW)]),
            S::Optional(AT_HIDDEN, &[S::Token(HIDDEN_KW)]),
            S::Ident,
        ],
    },
    Production {
        rule: R::PartialObjectExpression,
        node: Some(PARTIAL_OBJECT_EXPRESSION),
        label: "PARTIAL",
        body: &[S::Token(PARTIAL_KW), S::Ident, S::Token(DOT), S::Rule(R::PartialFieldSet)],
    },
    Production {
        rule: R::PartialFieldSet,
        node: Some(PARTIAL_FIELD_SET),
        label: "field set",
        body: &[
            S::Token(LEFT_BRACE),
            S::SeparatedBy(&[S::FieldName], COMMA),
            S::Token(RIGHT_BRACE),
        ],
    },
    Production {
        rule: R::NewObjectExpression,
        node: Some(NEW_OBJECT_EXPRESSION),
        label: "NEW",
        body: &[
            S::Token(NEW_KW),
            S::Optional(AT_NAMED, &[S::Token(NAMED_KW)]),
            S::Rule(R::AbstractSchemaName),
            S::Token(LEFT_PAREN),
            S::Optional(Guard::First, &[S::SeparatedBy(&[S::Rule(R::NewObjectArg)], COMMA)]),
            S::Token(RIGHT_PAREN),
        ],
    },
    Production {
        rule: R::NewObjectArg,
        node: Some(NEW_OBJECT_ARG),
        label: "constructor argument",
        body: &[
            S::Choice(
                &[
                    Alternative { guard: AT_NEW, body: &[S::Rule(R::NewObjectExpression)] },
                    Alternative {
                        guard: Guard::First,
                        body: &[S::Expression(Precedence::Additive)],
                    },
                ],
                "constructor argument",
            ),
            S::Optional(AT_AS, &[S::Rule(R::ResultAlias)]),
        ],
    },
    Production {
        rule: R::FromClause,
        node: Some(FROM_CLAUSE),
        label: "FROM",
        body: &[
            S::Token(FROM_KW),
            S::SeparatedBy(&[S::Rule(R::IdentificationVariableDeclaration)], COMMA),
        ],
    },
    Production {
        rule: R::IdentificationVariableDeclaration,
        node: Some(IDENTIFICATION_VARIABLE_DECLARATION),
        label: "entity declaration",
        body: &[
            S::Rule(R::RangeVariableDeclaration),
            S::Optional(AT_INDEX, &[S::Rule(R::IndexBy)]),
            S::Repeat(AT_JOIN, &[S::Rule(R::Join)]),
        ],
    },
    Production {
        rule: R::RangeVariableDeclaration,
        node: Some(RANGE_VARIABLE_DECLARATION),
        label: "entity declaration",
        body: &[S::Rule(R::AbstractSchemaName), S::Rule(R::AliasDeclaration)],
    },
    Production {
        rule: R::AbstractSchemaName,
        node: Some(ABSTRACT_SCHEMA_NAME),
        label: "entity name",
        body: &[
            S::Optional(AT_BACKSLASH, &[S::Token(BACKSLASH)]),
            S::Ident,
            S::Repeat(AT_BACKSLASH, &[S::Token(BACKSLASH), S::FieldName]),
        ],
    },
    Production {
        rule: R::AliasDeclaration,
        node: Some(ALIAS_DECLARATION),
        label: "alias",
        body: &[S::Optional(AT_AS, &[S::Token(AS_KW)]), S::Ident],
    },
    Production {
        rule: R::IndexBy,
        node: Some(INDEX_BY),
        label: "INDEX BY",
        body: &[S::Token(INDEX_KW), S::Token(BY_KW), S::Rule(R::PathExpression)],
    },
    Production {
        rule: R::Join,
        node: Some(JOIN),
        label: "JOIN",
        body: &[
            S::Optional(AT_LEFT, &[S::Token(LEFT_KW), S::Optional(AT_OUTER, &[S::Token(OUTER_KW)])]),
            S::Optional(AT_INNER, &[S::Token(INNER_KW)]),
            S::Token(JOIN_KW),
            S::Choice(
                &[
                    Alternative {
                        guard: AT_ASSOCIATION,
                        body: &[S::Rule(R::JoinAssociationDeclaration)],
                    },
                    Alternative {
                        guard: Guard::First,
                        body: &[S::Rule(R::RangeVariableDeclaration)],
                    },
                ],
                "join target",
            ),
            S::Optional(AT_JOIN_CONDITION, &[S::Rule(R::JoinCondition)]),
        ],
    },
    Production {
        rule: R::JoinAssociationDeclaration,
        node: Some(JOIN_ASSOCIATION_DECLARATION),
        label: "association",
        body: &[
            S::Rule(R::PathExpression),
            S::Rule(R::AliasDeclaration),
            S::Optional(AT_INDEX, &[S::Rule(R::IndexBy)]),
        ],
    },
    Production {
        rule: R::JoinCondition,
        node: Some(JOIN_CONDITION),
        label: "WITH or ON",
        body: &[S::OneOf(JOIN_CONDITIONS, "WITH or ON"), S::Expression(Precedence::Or)],
    },
    Production {
        rule: R::WhereClause,
        node: Some(WHERE_CLAUSE),
        label: "WHERE",
        body: &[S::Token(WHERE_KW), S::Expression(Precedence::Or)],
    },
    Production {
        rule: R::GroupByClause,
        node: Some(GROUP_BY_CLAUSE),
        label: "GROUP BY",
        body: &[
            S::Token(GROUP_KW),
            S::Token(BY_KW),
            S::SeparatedBy(&[S::Rule(R::GroupByItem)], COMMA),
        ],
    },
    Production {
        rule: R::GroupByItem,
        node: Some(GROUP_BY_ITEM),
        label: "grouping expression",
        body: &[S::Expression(Precedence::Additive)],
    },
    Production {
        rule: R::HavingClause,
        node: Some(HAVING_CLAUSE),
        label: "HAVING",
        body: &[S::Token(HAVING_KW), S::Expression(Precedence::Or)],
    },
    Production {
        rule: R::OrderByClause,
        node: Some(ORDER_BY_CLAUSE),
        label: "ORDER BY",
        body: &[
            S::Token(ORDER_KW),
            S::Token(BY_KW),
            S::SeparatedBy(&[S::Rule(R::OrderByItem)], COMMA),
        ],
    },
    Production {
        rule: R::OrderByItem,
        node: Some(ORDER_BY_ITEM),
        label: "ordering expression",
        body: &[
            S::Expression(Precedence::Additive),
            S::Optional(AT_DIRECTION, &[S::OneOf(DIRECTIONS, "ASC or DESC")]),
        ],
    },
    Production {
        rule: R::UpdateClause,
        node: Some(UPDATE_CLAUSE),
        label: "UPDATE",
        body: &[
            S::Token(UPDATE_KW),
            S::Rule(R::AbstractSchemaName),
            S::Optional(Guard::First, &[S::Rule(R::AliasDeclaration)]),
            S::Token(SET_KW),
            S::SeparatedBy(&[S::Rule(R::UpdateItem)], COMMA),
        ],
    },
    Production {
        rule: R::UpdateItem,
        node: Some(UPDATE_ITEM),
        label: "assignment",
        body: &[
            S::Rule(R::PathExpression),
            S::Token(EQ),
            S::Expression(Precedence::Additive),
        ],
    },
    Production {
        rule: R::DeleteClause,
        node: Some(DELETE_CLAUSE),
        label: "DELETE",
        body: &[
            S::Token(DELETE_KW),
            S::Optional(AT_FROM, &[S::Token(FROM_KW)]),
            S::Rule(R::AbstractSchemaName),
            S::Optional(Guard::First, &[S::Rule(R::AliasDeclaration)]),
        ],
    },
];
