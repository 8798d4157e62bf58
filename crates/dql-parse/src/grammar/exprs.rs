use dql_yellow::SyntaxKind::*;
use dql_yellow::SyntaxSet;

use super::{
    AGGREGATES, Alternative, Associativity, BinaryOperator, COMPARISON_OPERATORS,
    DATETIME_FUNCTIONS, FUNCTIONS, Guard, IDENT_LIKE, LITERALS, PARAMETERS, Precedence,
    Production, QUANTIFIERS, Rule as R, Symbol as S, TRIM_MODES, Tail,
};

const LEFT_PAREN_SET: SyntaxSet = SyntaxSet::new([LEFT_PAREN]);
const FROM_SET: SyntaxSet = SyntaxSet::new([FROM_KW]);
const STRING_SET: SyntaxSet = SyntaxSet::new([STRING]);
const STRING_OR_FROM: SyntaxSet = SyntaxSet::new([STRING, FROM_KW]);

const AT_SUBSELECT: Guard = Guard::Peek2(LEFT_PAREN_SET, SyntaxSet::new([SELECT_KW]));
const AT_LEFT_PAREN: Guard = Guard::Kinds(LEFT_PAREN_SET);
const AT_LITERAL: Guard = Guard::Kinds(LITERALS);
const AT_PARAMETER: Guard = Guard::Kinds(PARAMETERS);
const AT_AGGREGATE: Guard = Guard::Peek2(AGGREGATES, LEFT_PAREN_SET);
const AT_TRIM: Guard = Guard::Peek2(SyntaxSet::new([TRIM_KW]), LEFT_PAREN_SET);
const AT_FUNCTION: Guard = Guard::Peek2(FUNCTIONS, LEFT_PAREN_SET);
const AT_DATETIME: Guard = Guard::Kinds(DATETIME_FUNCTIONS);
const AT_EMPTY_PARENS: Guard = Guard::Peek2(LEFT_PAREN_SET, SyntaxSet::new([RIGHT_PAREN]));
const AT_GENERAL_CASE: Guard = Guard::Peek2(SyntaxSet::new([CASE_KW]), SyntaxSet::new([WHEN_KW]));
const AT_CASE: Guard = Guard::Kinds(SyntaxSet::new([CASE_KW]));
const AT_COALESCE: Guard = Guard::Kinds(SyntaxSet::new([COALESCE_KW]));
const AT_NULLIF: Guard = Guard::Kinds(SyntaxSet::new([NULLIF_KW]));
const AT_EXISTS: Guard = Guard::Kinds(SyntaxSet::new([EXISTS_KW]));
const AT_QUANTIFIER: Guard = Guard::Kinds(QUANTIFIERS);
const AT_PATH: Guard = Guard::Peek2(IDENT_LIKE, SyntaxSet::new([DOT]));
const AT_IDENT: Guard = Guard::Kinds(IDENT_LIKE);
const AT_DOT: Guard = Guard::Kinds(SyntaxSet::new([DOT]));
const AT_DISTINCT: Guard = Guard::Kinds(SyntaxSet::new([DISTINCT_KW]));
const AT_STAR: Guard = Guard::Kinds(SyntaxSet::new([STAR]));
const AT_WHEN: Guard = Guard::Kinds(SyntaxSet::new([WHEN_KW]));
const AT_ELSE: Guard = Guard::Kinds(SyntaxSet::new([ELSE_KW]));
const AT_ESCAPE: Guard = Guard::Kinds(SyntaxSet::new([ESCAPE_KW]));
const AT_NOT: Guard = Guard::Kinds(SyntaxSet::new([NOT_KW]));
const AT_OF: Guard = Guard::Kinds(SyntaxSet::new([OF_KW]));
const AT_TRIM_MODE: Guard = Guard::Kinds(TRIM_MODES);
const AT_STRING: Guard = Guard::Kinds(STRING_SET);
const AT_TRIM_SPECIFICATION: Guard = Guard::Any(&[
    Guard::Peek2(TRIM_MODES, STRING_OR_FROM),
    Guard::Peek2(STRING_SET, FROM_SET),
    Guard::Kinds(FROM_SET),
]);

pub(super) static PRODUCTIONS: &[Production] = &[
    Production {
        rule: R::Primary,
        node: None,
        label: "expression",
        body: &[S::Choice(
            &[
                Alternative { guard: AT_SUBSELECT, body: &[S::Rule(R::Subselect)] },
                Alternative { guard: AT_LEFT_PAREN, body: &[S::Rule(R::ParenExpression)] },
                Alternative { guard: AT_LITERAL, body: &[S::Rule(R::Literal)] },
                Alternative { guard: AT_PARAMETER, body: &[S::Rule(R::InputParameter)] },
                Alternative { guard: AT_AGGREGATE, body: &[S::Rule(R::AggregateExpression)] },
                Alternative { guard: AT_TRIM, body: &[S::Rule(R::TrimFunction)] },
                Alternative { guard: AT_FUNCTION, body: &[S::Rule(R::FunctionCall)] },
                Alternative { guard: AT_DATETIME, body: &[S::Rule(R::DatetimeFunction)] },
                Alternative { guard: AT_GENERAL_CASE, body: &[S::Rule(R::CaseExpression)] },
                Alternative { guard: AT_CASE, body: &[S::Rule(R::SimpleCaseExpression)] },
                Alternative { guard: AT_COALESCE, body: &[S::Rule(R::CoalesceExpression)] },
                Alternative { guard: AT_NULLIF, body: &[S::Rule(R::NullifExpression)] },
                Alternative { guard: AT_EXISTS, body: &[S::Rule(R::ExistsExpression)] },
                Alternative { guard: AT_QUANTIFIER, body: &[S::Rule(R::QuantifiedExpression)] },
                Alternative { guard: AT_PATH, body: &[S::Rule(R::PathExpression)] },
                Alternative { guard: AT_IDENT, body: &[S::Rule(R::IdentificationVariable)] },
            ],
            "expression",
        )],
    },
    Production {
        rule: R::Subselect,
        node: Some(SUBSELECT),
        label: "subquery",
        body: &[S::Token(LEFT_PAREN), S::Rule(R::SelectStatement), S::Token(RIGHT_PAREN)],
    },
    Production {
        rule: R::ParenExpression,
        node: Some(PAREN_EXPRESSION),
        label: "parenthesized expression",
        body: &[S::Token(LEFT_PAREN), S::Expression(Precedence::Or), S::Token(RIGHT_PAREN)],
    },
    Production {
        rule: R::Literal,
        node: Some(LITERAL),
        label: "literal",
        body: &[S::OneOf(LITERALS, "literal")],
    },
    Production {
        rule: R::InputParameter,
        node: Some(INPUT_PARAMETER),
        label: "input parameter",
        body: &[S::OneOf(PARAMETERS, "input parameter")],
    },
    Production {
        rule: R::PathExpression,
        node: Some(PATH_EXPRESSION),
        label: "path expression",
        body: &[S::Ident, S::Token(DOT), S::FieldName, S::Repeat(AT_DOT, &[S::Token(DOT), S::FieldName])],
    },
    Production {
        rule: R::IdentificationVariable,
        node: Some(IDENTIFICATION_VARIABLE),
        label: "identifier",
        body: &[S::Ident],
    },
    Production {
        rule: R::AggregateExpression,
        node: Some(AGGREGATE_EXPRESSION),
        label: "aggregate function",
        body: &[
            S::OneOf(AGGREGATES, "aggregate function"),
            S::Token(LEFT_PAREN),
            S::Optional(AT_DISTINCT, &[S::Token(DISTINCT_KW)]),
            S::Choice(
                &[
                    Alternative { guard: AT_STAR, body: &[S::Token(STAR)] },
                    Alternative {
                        guard: Guard::First,
                        body: &[S::Expression(Precedence::Additive)],
                    },
                ],
                "aggregate argument",
            ),
            S::Token(RIGHT_PAREN),
        ],
    },
    Production {
        rule: R::FunctionCall,
        node: Some(FUNCTION_CALL),
        label: "function call",
        body: &[S::OneOf(FUNCTIONS, "function name"), S::Rule(R::ArgList)],
    },
    Production {
        rule: R::ArgList,
        node: Some(ARG_LIST),
        label: "argument list",
        body: &[
            S::Token(LEFT_PAREN),
            S::Optional(
                Guard::First,
                &[S::SeparatedBy(&[S::Expression(Precedence::Additive)], COMMA)],
            ),
            S::Token(RIGHT_PAREN),
        ],
    },
    Production {
        rule: R::TrimFunction,
        node: Some(FUNCTION_CALL),
        label: "TRIM",
        body: &[
            S::Token(TRIM_KW),
            S::Token(LEFT_PAREN),
            S::Optional(AT_TRIM_SPECIFICATION, &[S::Rule(R::TrimSpecification)]),
            S::Expression(Precedence::Additive),
            S::Token(RIGHT_PAREN),
        ],
    },
    Production {
        rule: R::TrimSpecification,
        node: Some(TRIM_SPECIFICATION),
        label: "trim specification",
        body: &[
            S::Optional(AT_TRIM_MODE, &[S::OneOf(TRIM_MODES, "LEADING, TRAILING or BOTH")]),
            S::Optional(AT_STRING, &[S::Rule(R::Literal)]),
            S::Token(FROM_KW),
        ],
    },
    Production {
        rule: R::DatetimeFunction,
        node: Some(FUNCTION_CALL),
        label: "date function",
        body: &[
            S::OneOf(DATETIME_FUNCTIONS, "date function"),
            S::Optional(AT_EMPTY_PARENS, &[S::Token(LEFT_PAREN), S::Token(RIGHT_PAREN)]),
        ],
    },
    Production {
        rule: R::CaseExpression,
        node: Some(CASE_EXPRESSION),
        label: "CASE",
        body: &[
            S::Token(CASE_KW),
            S::Rule(R::WhenClause),
            S::Repeat(AT_WHEN, &[S::Rule(R::WhenClause)]),
            S::Optional(AT_ELSE, &[S::Token(ELSE_KW), S::Expression(Precedence::Or)]),
            S::Token(END_KW),
        ],
    },
    Production {
        rule: R::WhenClause,
        node: Some(WHEN_CLAUSE),
        label: "WHEN",
        body: &[
            S::Token(WHEN_KW),
            S::Expression(Precedence::Or),
            S::Token(THEN_KW),
            S::Expression(Precedence::Or),
        ],
    },
    Production {
        rule: R::SimpleCaseExpression,
        node: Some(SIMPLE_CASE_EXPRESSION),
        label: "CASE",
        body: &[
            S::Token(CASE_KW),
            S::Expression(Precedence::Additive),
            S::Rule(R::SimpleWhenClause),
            S::Repeat(AT_WHEN, &[S::Rule(R::SimpleWhenClause)]),
            S::Optional(AT_ELSE, &[S::Token(ELSE_KW), S::Expression(Precedence::Or)]),
            S::Token(END_KW),
        ],
    },
    Production {
        rule: R::SimpleWhenClause,
        node: Some(SIMPLE_WHEN_CLAUSE),
        label: "WHEN",
        body: &[
            S::Token(WHEN_KW),
            S::Expression(Precedence::Additive),
            S::Token(THEN_KW),
            S::Expression(Precedence::Or),
        ],
    },
    Production {
        rule: R::CoalesceExpression,
        node: Some(COALESCE_EXPRESSION),
        label: "COALESCE",
        body: &[
            S::Token(COALESCE_KW),
            S::Token(LEFT_PAREN),
            S::SeparatedBy(&[S::Expression(Precedence::Additive)], COMMA),
            S::Token(RIGHT_PAREN),
        ],
    },
    Production {
        rule: R::NullifExpression,
        node: Some(NULLIF_EXPRESSION),
        label: "NULLIF",
        body: &[
            S::Token(NULLIF_KW),
            S::Token(LEFT_PAREN),
            S::Expression(Precedence::Additive),
            S::Token(COMMA),
            S::Expression(Precedence::Additive),
            S::Token(RIGHT_PAREN),
        ],
    },
    Production {
        rule: R::ExistsExpression,
        node: Some(EXISTS_EXPRESSION),
        label: "EXISTS",
        body: &[S::Token(EXISTS_KW), S::Rule(R::Subselect)],
    },
    Production {
        rule: R::QuantifiedExpression,
        node: Some(QUANTIFIED_EXPRESSION),
        label: "ALL, ANY or SOME",
        body: &[S::OneOf(QUANTIFIERS, "ALL, ANY or SOME"), S::Rule(R::Subselect)],
    },
    Production {
        rule: R::InList,
        node: Some(IN_LIST),
        label: "value list",
        body: &[
            S::Token(LEFT_PAREN),
            S::SeparatedBy(&[S::Expression(Precedence::Additive)], COMMA),
            S::Token(RIGHT_PAREN),
        ],
    },
    Production {
        rule: R::InstanceOfList,
        node: Some(INSTANCE_OF_LIST),
        label: "entity list",
        body: &[
            S::Token(LEFT_PAREN),
            S::SeparatedBy(&[S::Rule(R::InstanceOfParameter)], COMMA),
            S::Token(RIGHT_PAREN),
        ],
    },
    Production {
        rule: R::InstanceOfParameter,
        node: None,
        label: "entity name or parameter",
        body: &[S::Choice(
            &[
                Alternative { guard: AT_PARAMETER, body: &[S::Rule(R::InputParameter)] },
                Alternative { guard: Guard::First, body: &[S::Rule(R::AbstractSchemaName)] },
            ],
            "entity name or parameter",
        )],
    },
];

pub(super) static OPERATORS: &[BinaryOperator] = &[
    BinaryOperator {
        token: OR_KW,
        precedence: Precedence::Or,
        associativity: Associativity::Left,
        node: OR_EXPRESSION,
    },
    BinaryOperator {
        token: AND_KW,
        precedence: Precedence::And,
        associativity: Associativity::Left,
        node: AND_EXPRESSION,
    },
    BinaryOperator {
        token: PLUS,
        precedence: Precedence::Additive,
        associativity: Associativity::Left,
        node: BINARY_EXPRESSION,
    },
    BinaryOperator {
        token: MINUS,
        precedence: Precedence::Additive,
        associativity: Associativity::Left,
        node: BINARY_EXPRESSION,
    },
    BinaryOperator {
        token: STAR,
        precedence: Precedence::Multiplicative,
        associativity: Associativity::Left,
        node: BINARY_EXPRESSION,
    },
    BinaryOperator {
        token: SLASH,
        precedence: Precedence::Multiplicative,
        associativity: Associativity::Left,
        node: BINARY_EXPRESSION,
    },
];

pub(super) static TAILS: &[Tail] = &[
    Tail {
        trigger: COMPARISON_OPERATORS,
        negatable: false,
        discriminant: None,
        node: COMPARISON_EXPRESSION,
        body: &[S::Expression(Precedence::Additive)],
    },
    Tail {
        trigger: SyntaxSet::new([BETWEEN_KW]),
        negatable: true,
        discriminant: None,
        node: BETWEEN_EXPRESSION,
        body: &[
            S::Expression(Precedence::Additive),
            S::Token(AND_KW),
            S::Expression(Precedence::Additive),
        ],
    },
    Tail {
        trigger: SyntaxSet::new([LIKE_KW]),
        negatable: true,
        discriminant: None,
        node: LIKE_EXPRESSION,
        body: &[
            S::Expression(Precedence::Additive),
            S::Optional(AT_ESCAPE, &[S::Token(ESCAPE_KW), S::Expression(Precedence::Unary)]),
        ],
    },
    Tail {
        trigger: SyntaxSet::new([IN_KW]),
        negatable: true,
        discriminant: None,
        node: IN_EXPRESSION,
        body: &[S::Choice(
            &[
                Alternative { guard: AT_SUBSELECT, body: &[S::Rule(R::Subselect)] },
                Alternative { guard: AT_LEFT_PAREN, body: &[S::Rule(R::InList)] },
                Alternative { guard: AT_PARAMETER, body: &[S::Rule(R::InputParameter)] },
            ],
            "value list",
        )],
    },
    Tail {
        trigger: SyntaxSet::new([IS_KW]),
        negatable: false,
        discriminant: Some(NULL_KW),
        node: NULL_COMPARISON_EXPRESSION,
        body: &[S::Optional(AT_NOT, &[S::Token(NOT_KW)]), S::Token(NULL_KW)],
    },
    Tail {
        trigger: SyntaxSet::new([IS_KW]),
        negatable: false,
        discriminant: Some(EMPTY_KW),
        node: EMPTY_COLLECTION_COMPARISON_EXPRESSION,
        body: &[S::Optional(AT_NOT, &[S::Token(NOT_KW)]), S::Token(EMPTY_KW)],
    },
    Tail {
        trigger: SyntaxSet::new([MEMBER_KW]),
        negatable: true,
        discriminant: None,
        node: COLLECTION_MEMBER_EXPRESSION,
        body: &[S::Optional(AT_OF, &[S::Token(OF_KW)]), S::Expression(Precedence::Unary)],
    },
    Tail {
        trigger: SyntaxSet::new([INSTANCE_KW]),
        negatable: true,
        discriminant: None,
        node: INSTANCE_OF_EXPRESSION,
        body: &[
            S::Optional(AT_OF, &[S::Token(OF_KW)]),
            S::Choice(
                &[
                    Alternative { guard: AT_LEFT_PAREN, body: &[S::Rule(R::InstanceOfList)] },
                    Alternative { guard: Guard::First, body: &[S::Rule(R::InstanceOfParameter)] },
                ],
                "entity name",
            ),
        ],
    },
];
