macro_rules! syntax_kinds {
    (
        punctuation { $($punct:ident = $punct_text:literal,)* }
        keywords { $($kw:ident = $kw_text:literal,)* }
        tokens { $($token:ident,)* }
        nodes { $($node:ident,)* }
    ) => {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($punct,)*
            $($kw,)*
            $($token,)*
            $($node,)*
        }

        impl SyntaxKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [SyntaxKind] = &[
                $(SyntaxKind::$punct,)*
                $(SyntaxKind::$kw,)*
                $(SyntaxKind::$token,)*
                $(SyntaxKind::$node,)*
            ];

            /// Every keyword kind.
            pub const KEYWORDS: &'static [SyntaxKind] = &[$(SyntaxKind::$kw,)*];

            /// Upper-case identifier of the kind, e.g. `SELECT_KW` or `FROM_CLAUSE`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(SyntaxKind::$punct => stringify!($punct),)*
                    $(SyntaxKind::$kw => stringify!($kw),)*
                    $(SyntaxKind::$token => stringify!($token),)*
                    $(SyntaxKind::$node => stringify!($node),)*
                }
            }

            /// Fixed source spelling of punctuation and keywords.
            pub const fn text(self) -> Option<&'static str> {
                match self {
                    $(SyntaxKind::$punct => Some($punct_text),)*
                    $(SyntaxKind::$kw => Some($kw_text),)*
                    _ => None,
                }
            }

            fn keyword_from_upper(upper: &str) -> Option<SyntaxKind> {
                match upper {
                    $($kw_text => Some(SyntaxKind::$kw),)*
                    _ => None,
                }
            }
        }
    };
}

syntax_kinds! {
    punctuation {
        LEFT_PAREN = "(",
        RIGHT_PAREN = ")",
        LEFT_BRACE = "{",
        RIGHT_BRACE = "}",
        COMMA = ",",
        DOT = ".",
        BACKSLASH = "\\",
        EQ = "=",
        NEQ = "<>",
        LT = "<",
        LT_EQ = "<=",
        GT = ">",
        GT_EQ = ">=",
        PLUS = "+",
        MINUS = "-",
        STAR = "*",
        SLASH = "/",
    }
    keywords {
        SELECT_KW = "SELECT",
        DISTINCT_KW = "DISTINCT",
        FROM_KW = "FROM",
        WHERE_KW = "WHERE",
        GROUP_KW = "GROUP",
        BY_KW = "BY",
        HAVING_KW = "HAVING",
        ORDER_KW = "ORDER",
        ASC_KW = "ASC",
        DESC_KW = "DESC",
        UPDATE_KW = "UPDATE",
        SET_KW = "SET",
        DELETE_KW = "DELETE",
        AS_KW = "AS",
        HIDDEN_KW = "HIDDEN",
        INDEX_KW = "INDEX",
        LEFT_KW = "LEFT",
        OUTER_KW = "OUTER",
        INNER_KW = "INNER",
        JOIN_KW = "JOIN",
        WITH_KW = "WITH",
        ON_KW = "ON",
        PARTIAL_KW = "PARTIAL",
        NEW_KW = "NEW",
        NAMED_KW = "NAMED",
        AND_KW = "AND",
        OR_KW = "OR",
        NOT_KW = "NOT",
        BETWEEN_KW = "BETWEEN",
        LIKE_KW = "LIKE",
        ESCAPE_KW = "ESCAPE",
        IN_KW = "IN",
        IS_KW = "IS",
        NULL_KW = "NULL",
        EXISTS_KW = "EXISTS",
        EMPTY_KW = "EMPTY",
        MEMBER_KW = "MEMBER",
        OF_KW = "OF",
        INSTANCE_KW = "INSTANCE",
        ALL_KW = "ALL",
        ANY_KW = "ANY",
        SOME_KW = "SOME",
        TRUE_KW = "TRUE",
        FALSE_KW = "FALSE",
        CASE_KW = "CASE",
        WHEN_KW = "WHEN",
        THEN_KW = "THEN",
        ELSE_KW = "ELSE",
        END_KW = "END",
        COALESCE_KW = "COALESCE",
        NULLIF_KW = "NULLIF",
        LEADING_KW = "LEADING",
        TRAILING_KW = "TRAILING",
        BOTH_KW = "BOTH",
        AVG_KW = "AVG",
        MAX_KW = "MAX",
        MIN_KW = "MIN",
        SUM_KW = "SUM",
        COUNT_KW = "COUNT",
        LENGTH_KW = "LENGTH",
        LOCATE_KW = "LOCATE",
        ABS_KW = "ABS",
        SQRT_KW = "SQRT",
        MOD_KW = "MOD",
        SIZE_KW = "SIZE",
        DATE_DIFF_KW = "DATE_DIFF",
        BIT_AND_KW = "BIT_AND",
        BIT_OR_KW = "BIT_OR",
        CONCAT_KW = "CONCAT",
        SUBSTRING_KW = "SUBSTRING",
        TRIM_KW = "TRIM",
        LOWER_KW = "LOWER",
        UPPER_KW = "UPPER",
        IDENTITY_KW = "IDENTITY",
        CURRENT_DATE_KW = "CURRENT_DATE",
        CURRENT_TIME_KW = "CURRENT_TIME",
        CURRENT_TIMESTAMP_KW = "CURRENT_TIMESTAMP",
        DATE_ADD_KW = "DATE_ADD",
        DATE_SUB_KW = "DATE_SUB",
    }
    tokens {
        IDENT,
        INT_NUMBER,
        FLOAT_NUMBER,
        STRING,
        NAMED_PARAMETER,
        POSITIONAL_PARAMETER,
        UNKNOWN,
        EOF,
    }
    nodes {
        SOURCE_FILE,
        SELECT_STATEMENT,
        UPDATE_STATEMENT,
        DELETE_STATEMENT,
        SELECT_CLAUSE,
        SELECT_EXPRESSION,
        RESULT_ALIAS,
        PARTIAL_OBJECT_EXPRESSION,
        PARTIAL_FIELD_SET,
        NEW_OBJECT_EXPRESSION,
        NEW_OBJECT_ARG,
        FROM_CLAUSE,
        IDENTIFICATION_VARIABLE_DECLARATION,
        RANGE_VARIABLE_DECLARATION,
        ABSTRACT_SCHEMA_NAME,
        ALIAS_DECLARATION,
        INDEX_BY,
        JOIN,
        JOIN_ASSOCIATION_DECLARATION,
        JOIN_CONDITION,
        WHERE_CLAUSE,
        GROUP_BY_CLAUSE,
        GROUP_BY_ITEM,
        HAVING_CLAUSE,
        ORDER_BY_CLAUSE,
        ORDER_BY_ITEM,
        UPDATE_CLAUSE,
        UPDATE_ITEM,
        DELETE_CLAUSE,
        OR_EXPRESSION,
        AND_EXPRESSION,
        NOT_EXPRESSION,
        COMPARISON_EXPRESSION,
        BETWEEN_EXPRESSION,
        LIKE_EXPRESSION,
        IN_EXPRESSION,
        IN_LIST,
        NULL_COMPARISON_EXPRESSION,
        EMPTY_COLLECTION_COMPARISON_EXPRESSION,
        COLLECTION_MEMBER_EXPRESSION,
        INSTANCE_OF_EXPRESSION,
        INSTANCE_OF_LIST,
        EXISTS_EXPRESSION,
        QUANTIFIED_EXPRESSION,
        BINARY_EXPRESSION,
        UNARY_EXPRESSION,
        PAREN_EXPRESSION,
        SUBSELECT,
        PATH_EXPRESSION,
        IDENTIFICATION_VARIABLE,
        LITERAL,
        INPUT_PARAMETER,
        AGGREGATE_EXPRESSION,
        FUNCTION_CALL,
        ARG_LIST,
        TRIM_SPECIFICATION,
        CASE_EXPRESSION,
        SIMPLE_CASE_EXPRESSION,
        WHEN_CLAUSE,
        SIMPLE_WHEN_CLAUSE,
        COALESCE_EXPRESSION,
        NULLIF_EXPRESSION,
        ERROR,
        MISSING,
        TOMBSTONE,
    }
}

impl SyntaxKind {
    /// Longest keyword spelling, `CURRENT_TIMESTAMP`.
    const MAX_KEYWORD_LEN: usize = 17;

    /// Resolves an identifier to a keyword, ignoring ASCII case.
    pub fn from_keyword(ident: &str) -> Option<Self> {
        if ident.len() > Self::MAX_KEYWORD_LEN || !ident.is_ascii() {
            return None;
        }

        let mut buf = [0u8; Self::MAX_KEYWORD_LEN];
        let upper = &mut buf[..ident.len()];
        upper.copy_from_slice(ident.as_bytes());
        upper.make_ascii_uppercase();

        std::str::from_utf8(upper).ok().and_then(Self::keyword_from_upper)
    }

    /// Resolves a kind from its name, ignoring case (`from_clause`, `IDENT`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn is_keyword(self) -> bool {
        (SyntaxKind::SELECT_KW..=SyntaxKind::DATE_SUB_KW).contains(&self)
    }

    pub fn is_punct(self) -> bool {
        self <= SyntaxKind::SLASH
    }

    /// `true` for every kind that appears as a leaf token.
    pub fn is_token(self) -> bool {
        self <= SyntaxKind::EOF
    }

    pub fn is_node(self) -> bool {
        !self.is_token()
    }
}
