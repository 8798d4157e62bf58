//! The DQL grammar as data.
//!
//! Every non-terminal is a [`Production`]: the node kind it builds and a
//! right-hand side made of [`Symbol`]s. Expressions are the exception: binary
//! operators live in an operator table and the comparison family (`=`,
//! `BETWEEN`, `LIKE`, `IN`, `IS`, `MEMBER`, `INSTANCE`) in a tail table, both
//! driven by the precedence climbing loop of the engine.

use std::sync::LazyLock;

use dql_yellow::SyntaxKind::{self, *};
use dql_yellow::SyntaxSet;

mod exprs;
mod statements;

macro_rules! rules {
    ($($rule:ident,)*) => {
        /// Name of a non-terminal.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Rule {
            $($rule,)*
        }

        impl Rule {
            pub const ALL: &'static [Self] = &[$(Self::$rule,)*];
        }
    };
}

rules! {
    Statement,
    SelectStatement,
    UpdateStatement,
    DeleteStatement,
    SelectClause,
    SelectExpression,
    ResultAlias,
    PartialObjectExpression,
    PartialFieldSet,
    NewObjectExpression,
    NewObjectArg,
    FromClause,
    IdentificationVariableDeclaration,
    RangeVariableDeclaration,
    AbstractSchemaName,
    AliasDeclaration,
    IndexBy,
    Join,
    JoinAssociationDeclaration,
    JoinCondition,
    WhereClause,
    GroupByClause,
    GroupByItem,
    HavingClause,
    OrderByClause,
    OrderByItem,
    UpdateClause,
    UpdateItem,
    DeleteClause,
    Primary,
    Subselect,
    ParenExpression,
    Literal,
    InputParameter,
    PathExpression,
    IdentificationVariable,
    AggregateExpression,
    FunctionCall,
    ArgList,
    TrimFunction,
    TrimSpecification,
    DatetimeFunction,
    CaseExpression,
    WhenClause,
    SimpleCaseExpression,
    SimpleWhenClause,
    CoalesceExpression,
    NullifExpression,
    ExistsExpression,
    QuantifiedExpression,
    InList,
    InstanceOfList,
    InstanceOfParameter,
}

/// One element of a right-hand side.
#[derive(Debug, Clone, Copy)]
pub enum Symbol {
    Token(SyntaxKind),
    /// Any token of the set; the label names it in diagnostics.
    OneOf(SyntaxSet, &'static str),
    /// An identifier. Soft keywords are accepted and re-tagged as `IDENT`.
    Ident,
    /// A field name after `.` or `\`. Every keyword is accepted and re-tagged
    /// as `IDENT`.
    FieldName,
    Rule(Rule),
    Optional(Guard, &'static [Symbol]),
    Repeat(Guard, &'static [Symbol]),
    /// One or more repetitions of the body separated by the token.
    SeparatedBy(&'static [Symbol], SyntaxKind),
    /// The first alternative whose guard matches wins.
    Choice(&'static [Alternative], &'static str),
    /// An expression binding at least as tightly as the precedence.
    Expression(Precedence),
}

/// Decides whether an optional part, a repetition or an alternative is taken.
#[derive(Debug, Clone, Copy)]
pub enum Guard {
    /// The current token is in the FIRST set of the guarded body.
    First,
    Kinds(SyntaxSet),
    /// Two tokens of lookahead: the current one and the one after it.
    Peek2(SyntaxSet, SyntaxSet),
    Any(&'static [Guard]),
}

#[derive(Debug, Clone, Copy)]
pub struct Alternative {
    pub guard: Guard,
    pub body: &'static [Symbol],
}

#[derive(Debug)]
pub struct Production {
    pub rule: Rule,
    /// `None` for rules that only group or select other rules.
    pub node: Option<SyntaxKind>,
    pub label: &'static str,
    pub body: &'static [Symbol],
}

/// Binding strength, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Or,
    And,
    Not,
    Comparison,
    Additive,
    Multiplicative,
    Unary,
}

impl Precedence {
    pub fn next(self) -> Self {
        match self {
            Self::Or => Self::And,
            Self::And => Self::Not,
            Self::Not => Self::Comparison,
            Self::Comparison => Self::Additive,
            Self::Additive => Self::Multiplicative,
            Self::Multiplicative | Self::Unary => Self::Unary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug)]
pub struct BinaryOperator {
    pub token: SyntaxKind,
    pub precedence: Precedence,
    pub associativity: Associativity,
    pub node: SyntaxKind,
}

/// A comparison-family construct that continues an already parsed operand.
///
/// Tails bind at [`Precedence::Comparison`] and do not chain: `a = b = c`
/// stops after `a = b`.
#[derive(Debug)]
pub struct Tail {
    pub trigger: SyntaxSet,
    /// Whether `NOT` may appear right before the trigger.
    pub negatable: bool,
    /// Token after the trigger (and an optional `NOT`) that selects this tail
    /// among tails sharing a trigger.
    pub discriminant: Option<SyntaxKind>,
    pub node: SyntaxKind,
    /// Symbols after the trigger.
    pub body: &'static [Symbol],
}

const fn keywords() -> SyntaxSet {
    let mut set = SyntaxSet::EMPTY;
    let mut i = 0;
    while i < SyntaxKind::KEYWORDS.len() {
        set = set.with(SyntaxKind::KEYWORDS[i]);
        i += 1;
    }
    set
}

pub const STATEMENT_START: SyntaxSet = SyntaxSet::new([SELECT_KW, UPDATE_KW, DELETE_KW]);

/// Tokens no recovery ever skips over.
pub const SYNC: SyntaxSet = STATEMENT_START.union(&SyntaxSet::new([
    FROM_KW,
    WHERE_KW,
    GROUP_KW,
    HAVING_KW,
    ORDER_KW,
    SET_KW,
    JOIN_KW,
    LEFT_KW,
    INNER_KW,
    WITH_KW,
    ON_KW,
    RIGHT_PAREN,
    RIGHT_BRACE,
    COMMA,
    THEN_KW,
    ELSE_KW,
    END_KW,
    WHEN_KW,
    AND_KW,
    OR_KW,
    EOF,
]));

pub const AGGREGATES: SyntaxSet = SyntaxSet::new([AVG_KW, MAX_KW, MIN_KW, SUM_KW, COUNT_KW]);

pub const FUNCTIONS: SyntaxSet = SyntaxSet::new([
    LENGTH_KW,
    LOCATE_KW,
    ABS_KW,
    SQRT_KW,
    MOD_KW,
    SIZE_KW,
    DATE_DIFF_KW,
    BIT_AND_KW,
    BIT_OR_KW,
    CONCAT_KW,
    SUBSTRING_KW,
    LOWER_KW,
    UPPER_KW,
    IDENTITY_KW,
    DATE_ADD_KW,
    DATE_SUB_KW,
]);

pub const DATETIME_FUNCTIONS: SyntaxSet =
    SyntaxSet::new([CURRENT_DATE_KW, CURRENT_TIME_KW, CURRENT_TIMESTAMP_KW]);

pub const TRIM_MODES: SyntaxSet = SyntaxSet::new([LEADING_KW, TRAILING_KW, BOTH_KW]);

/// Keywords that read as identifiers wherever an identifier is expected and
/// the two-token guards do not select the keyword reading.
pub const SOFT_KEYWORDS: SyntaxSet =
    AGGREGATES.union(&FUNCTIONS).union(&TRIM_MODES).with(TRIM_KW);

pub const IDENT_LIKE: SyntaxSet = SOFT_KEYWORDS.with(IDENT);

pub const FIELD_NAME: SyntaxSet = keywords().with(IDENT);

pub const LITERALS: SyntaxSet =
    SyntaxSet::new([INT_NUMBER, FLOAT_NUMBER, STRING, TRUE_KW, FALSE_KW, NULL_KW]);

pub const PARAMETERS: SyntaxSet = SyntaxSet::new([NAMED_PARAMETER, POSITIONAL_PARAMETER]);

pub const COMPARISON_OPERATORS: SyntaxSet = SyntaxSet::new([EQ, NEQ, LT, LT_EQ, GT, GT_EQ]);

pub const QUANTIFIERS: SyntaxSet = SyntaxSet::new([ALL_KW, ANY_KW, SOME_KW]);

/// Tokens that can continue an expression after an operand.
pub const EXPRESSION_CONTINUATION: SyntaxSet = COMPARISON_OPERATORS.union(&SyntaxSet::new([
    OR_KW,
    AND_KW,
    NOT_KW,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    BETWEEN_KW,
    LIKE_KW,
    IN_KW,
    IS_KW,
    MEMBER_KW,
    INSTANCE_KW,
]));

pub struct Grammar {
    productions: Vec<&'static Production>,
    first: Vec<SyntaxSet>,
    nullable: Vec<bool>,
}

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(Grammar::build);

impl Grammar {
    /// The process-wide grammar table.
    pub fn get() -> &'static Self {
        &GRAMMAR
    }

    fn build() -> Self {
        let mut slots: Vec<Option<&'static Production>> = vec![None; Rule::ALL.len()];
        for production in statements::PRODUCTIONS.iter().chain(exprs::PRODUCTIONS) {
            let slot = &mut slots[production.rule as usize];
            assert!(slot.is_none(), "{:?} has two productions", production.rule);
            *slot = Some(production);
        }

        let productions: Vec<_> = slots
            .into_iter()
            .zip(Rule::ALL)
            .map(|(slot, rule)| slot.unwrap_or_else(|| panic!("{rule:?} has no production")))
            .collect();

        let mut grammar = Self {
            first: vec![SyntaxSet::EMPTY; productions.len()],
            nullable: vec![false; productions.len()],
            productions,
        };

        // FIRST sets and nullability only grow, so this reaches a fixpoint.
        let mut changed = true;
        while changed {
            changed = false;
            for &rule in Rule::ALL {
                let index = rule as usize;
                let (first, nullable) = grammar.first_of_sequence(grammar.productions[index].body);
                if first != grammar.first[index] || nullable != grammar.nullable[index] {
                    grammar.first[index] = first;
                    grammar.nullable[index] = nullable;
                    changed = true;
                }
            }
        }

        grammar
    }

    pub fn rule_for(&self, rule: Rule) -> &'static Production {
        self.productions[rule as usize]
    }

    pub fn productions(&self) -> impl Iterator<Item = &'static Production> + '_ {
        self.productions.iter().copied()
    }

    pub fn first(&self, rule: Rule) -> &SyntaxSet {
        &self.first[rule as usize]
    }

    pub fn nullable(&self, rule: Rule) -> bool {
        self.nullable[rule as usize]
    }

    pub fn operator(&self, kind: SyntaxKind) -> Option<&'static BinaryOperator> {
        exprs::OPERATORS.iter().find(|operator| operator.token == kind)
    }

    pub fn operators(&self) -> &'static [BinaryOperator] {
        exprs::OPERATORS
    }

    pub fn tails(&self) -> &'static [Tail] {
        exprs::TAILS
    }

    /// Tokens that can start an expression of at least `precedence`.
    pub fn expression_first(&self, precedence: Precedence) -> SyntaxSet {
        let first = self.first(Rule::Primary).union(&SyntaxSet::new([PLUS, MINUS]));
        if precedence <= Precedence::Not { first.with(NOT_KW) } else { first }
    }

    pub fn first_of_symbol(&self, symbol: &Symbol) -> (SyntaxSet, bool) {
        match *symbol {
            Symbol::Token(kind) => (SyntaxSet::from_kind(kind), false),
            Symbol::OneOf(set, _) => (set, false),
            Symbol::Ident => (IDENT_LIKE, false),
            Symbol::FieldName => (FIELD_NAME, false),
            Symbol::Rule(rule) => (*self.first(rule), self.nullable(rule)),
            Symbol::Optional(_, body) | Symbol::Repeat(_, body) => {
                (self.first_of_sequence(body).0, true)
            }
            Symbol::SeparatedBy(body, _) => self.first_of_sequence(body),
            Symbol::Choice(alternatives, _) => {
                alternatives.iter().fold((SyntaxSet::EMPTY, false), |(first, nullable), alt| {
                    let (alt_first, alt_nullable) = self.first_of_sequence(alt.body);
                    (first.union(&alt_first), nullable || alt_nullable)
                })
            }
            Symbol::Expression(precedence) => (self.expression_first(precedence), false),
        }
    }

    /// FIRST set of a sequence and whether the whole sequence can be empty.
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> (SyntaxSet, bool) {
        let mut first = SyntaxSet::EMPTY;
        for symbol in symbols {
            let (symbol_first, nullable) = self.first_of_symbol(symbol);
            first = first.union(&symbol_first);
            if !nullable {
                return (first, false);
            }
        }
        (first, true)
    }

    /// Tokens that may follow `symbols` when `follow` may follow the whole.
    pub fn follow_of(&self, symbols: &[Symbol], follow: &SyntaxSet) -> SyntaxSet {
        let (first, nullable) = self.first_of_sequence(symbols);
        if nullable { first.union(follow) } else { first }
    }
}
