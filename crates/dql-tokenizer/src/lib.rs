mod cursor;

use cursor::Cursor;
pub use dql_yellow::SyntaxKind;
use dql_yellow::SyntaxKind::*;
use dql_yellow::{GreenTrivia, TriviaPiece, TriviaPieceKind};
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("invalid character")]
    InvalidCharacter,
    #[error("incomplete input parameter")]
    IncompleteParameter,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub leading: GreenTrivia,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
    pub trailing: GreenTrivia,
    /// Zero-based line of `kind_range.start()`.
    pub line: u32,
    /// Zero-based byte column of `kind_range.start()`.
    pub column: u32,
    pub error: Option<LexErrorKind>,
}

impl Token {
    const EOF: Self = Self {
        kind: EOF,
        kind_range: TextRange::empty(TextSize::new(0)),
        leading: GreenTrivia::empty(),
        trailing: GreenTrivia::empty(),
        line: 0,
        column: 0,
        error: None,
    };

    /// Range including leading and trailing trivia.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(
            self.kind_range.start() - self.leading.len(),
            self.kind_range.end() + self.trailing.len(),
        )
    }
}

pub struct Tokenizer<'t> {
    text: &'t str,
    cursor: Cursor<'t>,
    current: Token,
    trivia_pieces: Vec<TriviaPiece>,
}

impl<'t> Tokenizer<'t> {
    pub fn new(text: &'t str) -> Self {
        Self::new_at(text, TextSize::new(0))
    }

    /// Starts lexing at `offset`, which must be a token boundary: trivia
    /// before the first token is treated as its leading trivia.
    pub fn new_at(text: &'t str, offset: TextSize) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new_at(text, offset),
            current: Token::EOF,
            trivia_pieces: Vec::with_capacity(4),
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Exclusive end of the furthest byte looked at so far, `len + 1` once
    /// the end of input has been observed.
    pub fn examined_end(&self) -> TextSize {
        self.cursor.examined_end()
    }

    fn range(&self) -> TextRange {
        let end = self.cursor.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'t str {
        &self.text[self.range()]
    }

    pub fn next_token(&mut self) -> Token {
        self.trivia();
        let trailing_start = self.trivia_pieces.len();
        let (line, column) = (self.cursor.line(), self.cursor.column());
        let (kind, kind_range, error) = self.syntax_kind();
        self.trivia();

        let (leading, trailing) = self.trivia_pieces.split_at(trailing_start);
        let leading = GreenTrivia::new(leading);
        let trailing = GreenTrivia::new(trailing);

        self.trivia_pieces.clear();
        std::mem::replace(
            &mut self.current,
            Token { leading, kind, kind_range, trailing, line, column, error },
        )
    }

    fn trivia(&mut self) {
        loop {
            let kind = match self.cursor.peek() {
                '-' if self.cursor.second() == '-' => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    TriviaPieceKind::LineComment
                }
                '/' if self.cursor.second() == '*' => {
                    // Unterminated comments are lexed as an erroneous token instead.
                    let Some(end) = self.cursor.as_str()[2..].find("*/") else {
                        break;
                    };
                    self.cursor.examine(self.cursor.offset() + TextSize::new(end as u32 + 4));
                    self.cursor.advance_bytes(end + 4);
                    TriviaPieceKind::BlockComment
                }
                '\r' if self.cursor.second() == '\n' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                '\n' | '\r' => {
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                first_char => {
                    if first_char.is_whitespace() && !self.cursor.is_eof() {
                        self.cursor.advance_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
                        TriviaPieceKind::Whitespace
                    } else {
                        break;
                    }
                }
            };

            self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();
        }
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TextRange, Option<LexErrorKind>) {
        let mut error = None;

        let kind = if self.cursor.is_eof() {
            EOF
        } else {
            match self.cursor.advance() {
                '(' => LEFT_PAREN,
                ')' => RIGHT_PAREN,
                '{' => LEFT_BRACE,
                '}' => RIGHT_BRACE,
                ',' => COMMA,
                '\\' => BACKSLASH,
                '=' => EQ,
                '+' => PLUS,
                '-' => MINUS,
                '*' => STAR,
                '/' if self.cursor.matches('*') => {
                    self.cursor.advance_while(|_| true);
                    error = Some(LexErrorKind::UnterminatedComment);
                    UNKNOWN
                }
                '/' => SLASH,
                '<' => match self.cursor.peek() {
                    '=' => {
                        self.cursor.advance();
                        LT_EQ
                    }
                    '>' => {
                        self.cursor.advance();
                        NEQ
                    }
                    _ => LT,
                },
                '>' => {
                    if self.cursor.matches('=') {
                        self.cursor.advance();
                        GT_EQ
                    } else {
                        GT
                    }
                }
                '!' if self.cursor.matches('=') => {
                    self.cursor.advance();
                    NEQ
                }
                '.' if self.cursor.peek().is_ascii_digit() => self.number('.', &mut error),
                '.' => DOT,
                first_char @ '0'..='9' => self.number(first_char, &mut error),
                '\'' => self.string(&mut error),
                ':' if is_ident_start(self.cursor.peek()) => {
                    self.cursor.advance_while(is_ident_continue);
                    NAMED_PARAMETER
                }
                '?' if self.cursor.peek().is_ascii_digit() => {
                    self.cursor.advance_while(|c| c.is_ascii_digit());
                    POSITIONAL_PARAMETER
                }
                ':' | '?' => {
                    error = Some(LexErrorKind::IncompleteParameter);
                    UNKNOWN
                }
                c if is_ident_start(c) => {
                    self.cursor.advance_while(is_ident_continue);
                    SyntaxKind::from_keyword(self.text()).unwrap_or(IDENT)
                }
                _ => {
                    error = Some(LexErrorKind::InvalidCharacter);
                    UNKNOWN
                }
            }
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();

        (kind, range, error)
    }

    fn number(&mut self, first_char: char, error: &mut Option<LexErrorKind>) -> SyntaxKind {
        let mut kind = INT_NUMBER;

        if first_char == '.' {
            self.digits();
            kind = FLOAT_NUMBER;
        } else {
            self.digits();
            if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
                self.cursor.advance();
                self.digits();
                kind = FLOAT_NUMBER;
            }
        }

        if matches!(self.cursor.peek(), 'e' | 'E') {
            self.cursor.advance();
            if matches!(self.cursor.peek(), '+' | '-') {
                self.cursor.advance();
            }
            if !self.cursor.peek().is_ascii_digit() {
                return self.invalid_number(error);
            }
            self.digits();
            kind = FLOAT_NUMBER;
        }

        if is_ident_continue(self.cursor.peek()) && !self.cursor.is_eof() {
            return self.invalid_number(error);
        }

        kind
    }

    fn invalid_number(&mut self, error: &mut Option<LexErrorKind>) -> SyntaxKind {
        self.cursor.advance_while(|c| is_ident_continue(c) || c == '.');
        *error = Some(LexErrorKind::InvalidNumber);
        UNKNOWN
    }

    fn digits(&mut self) {
        self.cursor.advance_while(|c| c.is_ascii_digit());
    }

    fn string(&mut self, error: &mut Option<LexErrorKind>) -> SyntaxKind {
        loop {
            if self.cursor.is_eof() {
                *error = Some(LexErrorKind::UnterminatedString);
                return UNKNOWN;
            }
            match self.cursor.advance() {
                '\\' => {
                    if !self.cursor.is_eof() {
                        self.cursor.advance();
                    }
                }
                '\'' if self.cursor.matches('\'') => {
                    self.cursor.advance();
                }
                '\'' => return STRING,
                _ => {}
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lazily lexes `text` from `start_offset` up to and including `EOF`.
pub fn tokenize(text: &str, start_offset: TextSize) -> Tokens<'_> {
    Tokens { tokenizer: Tokenizer::new_at(text, start_offset), done: false }
}

pub struct Tokens<'t> {
    tokenizer: Tokenizer<'t>,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.tokenizer.next_token();
        self.done = token.kind == EOF;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_text<'a>(token: &Token, text: &'a str) -> &'a str {
        &text[token.kind_range]
    }

    fn kinds(text: &str) -> Vec<(SyntaxKind, &str)> {
        tokenize(text, TextSize::new(0))
            .map(|token| (token.kind, token_text(&token, text)))
            .collect()
    }

    fn single(text: &str) -> Token {
        let mut tokenizer = Tokenizer::new(text);
        let token = tokenizer.next_token();
        assert_eq!(tokenizer.peek().kind, EOF, "Input: '{text}' was not consumed by one token");
        token
    }

    #[test]
    fn test_keywords_ignore_case() {
        let text = "select Select SELECT fRoM users";
        assert_eq!(
            kinds(text),
            vec![
                (SELECT_KW, "select"),
                (SELECT_KW, "Select"),
                (SELECT_KW, "SELECT"),
                (FROM_KW, "fRoM"),
                (IDENT, "users"),
                (EOF, ""),
            ]
        );
    }

    #[test]
    fn test_number_literals() {
        let inputs = vec![
            ("123", INT_NUMBER),
            ("0", INT_NUMBER),
            ("123.456", FLOAT_NUMBER),
            (".5", FLOAT_NUMBER),
            ("1e10", FLOAT_NUMBER),
            ("1.0E-5", FLOAT_NUMBER),
        ];

        for (input, expected_kind) in inputs {
            let token = single(input);
            assert_eq!(token.kind, expected_kind, "Input: '{input}'");
            assert_eq!(token.error, None, "Input: '{input}'");
        }
    }

    #[test]
    fn test_invalid_numbers() {
        for input in ["1e", "1e+", "12abc", "3.5x"] {
            let token = single(input);
            assert_eq!(token.kind, UNKNOWN, "Input: '{input}'");
            assert_eq!(token.error, Some(LexErrorKind::InvalidNumber), "Input: '{input}'");
            assert_eq!(token.kind_range.len(), TextSize::of(input));
        }
    }

    #[test]
    fn test_int_followed_by_dot() {
        let text = "1.x";
        assert_eq!(kinds(text), vec![(INT_NUMBER, "1"), (DOT, "."), (IDENT, "x"), (EOF, "")]);
    }

    #[test]
    fn test_strings() {
        for input in ["'abc'", "''", "'it''s'", r"'a\'b'", "'multi\nline'"] {
            let token = single(input);
            assert_eq!(token.kind, STRING, "Input: {input:?}");
            assert_eq!(token.error, None);
        }

        let token = single("'abc");
        assert_eq!(token.kind, UNKNOWN);
        assert_eq!(token.error, Some(LexErrorKind::UnterminatedString));
    }

    #[test]
    fn test_parameters() {
        let text = ":name ?1 ?42";
        assert_eq!(
            kinds(text),
            vec![
                (NAMED_PARAMETER, ":name"),
                (POSITIONAL_PARAMETER, "?1"),
                (POSITIONAL_PARAMETER, "?42"),
                (EOF, ""),
            ]
        );

        let tokens: Vec<_> = tokenize("? :", TextSize::new(0)).collect();
        assert_eq!(tokens[0].error, Some(LexErrorKind::IncompleteParameter));
        assert_eq!(tokens[1].error, Some(LexErrorKind::IncompleteParameter));
    }

    #[test]
    fn test_operators() {
        let text = "= <> != < <= > >= + - * / ( ) { } , . \\";
        let got: Vec<_> = kinds(text).into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            got,
            vec![
                EQ,
                NEQ,
                NEQ,
                LT,
                LT_EQ,
                GT,
                GT_EQ,
                PLUS,
                MINUS,
                STAR,
                SLASH,
                LEFT_PAREN,
                RIGHT_PAREN,
                LEFT_BRACE,
                RIGHT_BRACE,
                COMMA,
                DOT,
                BACKSLASH,
                EOF,
            ]
        );
    }

    #[test]
    fn test_minus_is_never_part_of_a_number() {
        assert_eq!(kinds("-1"), vec![(MINUS, "-"), (INT_NUMBER, "1"), (EOF, "")]);
        assert_eq!(kinds("a-1"), vec![(IDENT, "a"), (MINUS, "-"), (INT_NUMBER, "1"), (EOF, "")]);
    }

    #[test]
    fn test_trivia_attachment() {
        let text = "  -- lead\nSELECT /* c */ u -- tail\n";
        let tokens: Vec<_> = tokenize(text, TextSize::new(0)).collect();

        let select = &tokens[0];
        assert_eq!(select.kind, SELECT_KW);
        let leading: Vec<_> = select.leading.pieces().iter().map(|piece| piece.kind).collect();
        assert_eq!(
            leading,
            vec![TriviaPieceKind::Whitespace, TriviaPieceKind::LineComment, TriviaPieceKind::Newline]
        );
        let trailing: Vec<_> = select.trailing.pieces().iter().map(|piece| piece.kind).collect();
        assert_eq!(
            trailing,
            vec![
                TriviaPieceKind::Whitespace,
                TriviaPieceKind::BlockComment,
                TriviaPieceKind::Whitespace
            ]
        );
        assert_eq!((select.line, select.column), (1, 0));

        let ident = &tokens[1];
        assert_eq!(ident.kind, IDENT);
        assert!(ident.leading.is_empty());
        assert_eq!(ident.full_range().end(), TextSize::of(text));
        assert_eq!((ident.line, ident.column), (1, 15));

        let eof = &tokens[2];
        assert_eq!(eof.kind, EOF);
        assert_eq!(eof.full_range(), TextRange::empty(TextSize::of(text)));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let text = "u /* never closed";
        let tokens: Vec<_> = tokenize(text, TextSize::new(0)).collect();
        assert_eq!(tokens[1].kind, UNKNOWN);
        assert_eq!(tokens[1].error, Some(LexErrorKind::UnterminatedComment));
        assert_eq!(token_text(&tokens[1], text), "/* never closed");
        assert_eq!(tokens[2].kind, EOF);
    }

    #[test]
    fn test_invalid_characters_consume_one_char() {
        let text = "a # é \0 b";
        let tokens: Vec<_> = tokenize(text, TextSize::new(0)).collect();
        let got: Vec<_> =
            tokens.iter().map(|token| (token.kind, token_text(token, text), token.error)).collect();
        assert_eq!(
            got,
            vec![
                (IDENT, "a", None),
                (UNKNOWN, "#", Some(LexErrorKind::InvalidCharacter)),
                (UNKNOWN, "é", Some(LexErrorKind::InvalidCharacter)),
                (UNKNOWN, "\0", Some(LexErrorKind::InvalidCharacter)),
                (IDENT, "b", None),
                (EOF, "", None),
            ]
        );
    }

    #[test]
    fn test_tokens_cover_input() {
        let text = "SELECT u.name, COUNT(p) FROM App\\User u -- done\n WHERE u.age >= :min";
        let mut end = TextSize::new(0);
        for token in tokenize(text, TextSize::new(0)) {
            assert_eq!(token.full_range().start(), end);
            end = token.full_range().end();
        }
        assert_eq!(end, TextSize::of(text));
    }

    #[test]
    fn test_restart_mid_text() {
        let text = "SELECT a FROM B b";
        let tokens: Vec<_> = tokenize(text, TextSize::new(9)).map(|token| token.kind).collect();
        assert_eq!(tokens, vec![FROM_KW, IDENT, IDENT, EOF]);
    }

    #[test]
    fn test_examined_end() {
        let text = "SELECT a FROM b";
        let mut tokenizer = Tokenizer::new(text);
        // The first token is lexed eagerly, including its trailing trivia and one char of lookahead.
        assert_eq!(tokenizer.examined_end(), TextSize::new(8));

        while tokenizer.next_token().kind != EOF {}
        assert_eq!(tokenizer.examined_end(), TextSize::of(text) + TextSize::new(1));
    }
}
