use std::cell::Cell;
use std::str::Chars;

use text_size::{TextLen, TextSize};

pub(crate) const EOF_CHAR: char = '\0';

pub(crate) struct Cursor<'t> {
    chars: Chars<'t>,
    text_len: TextSize,
    len: TextSize,
    /// Exclusive end of the furthest byte looked at; `text_len + 1` once the
    /// end of input has been observed.
    examined_end: Cell<TextSize>,
    line: u32,
    line_start: TextSize,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new_at(text: &'t str, offset: TextSize) -> Self {
        let before = &text[..usize::from(offset)];
        let line = before.bytes().filter(|&byte| byte == b'\n').count() as u32;
        let line_start = before.rfind('\n').map_or(TextSize::new(0), |index| TextSize::new(index as u32 + 1));

        let rest = &text[usize::from(offset)..];
        Self {
            chars: rest.chars(),
            text_len: text.text_len(),
            len: rest.text_len(),
            examined_end: Cell::new(offset),
            line,
            line_start,
        }
    }

    fn remaining(&self) -> TextSize {
        TextSize::new(self.chars.as_str().len() as u32)
    }

    pub(crate) fn offset(&self) -> TextSize {
        self.text_len - self.remaining()
    }

    pub(crate) fn as_str(&self) -> &'t str {
        self.chars.as_str()
    }

    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    pub(crate) fn column(&self) -> u32 {
        (self.offset() - self.line_start).into()
    }

    pub(crate) fn examined_end(&self) -> TextSize {
        self.examined_end.get()
    }

    /// Records that everything before `end` has been looked at.
    pub(crate) fn examine(&self, end: TextSize) {
        if end > self.examined_end.get() {
            self.examined_end.set(end);
        }
    }

    fn examine_chars(&self, count: usize) {
        let rest = self.as_str();
        let mut chars = rest.char_indices();
        let end = match chars.nth(count - 1) {
            Some((index, c)) => self.offset() + TextSize::new((index + c.len_utf8()) as u32),
            None => self.text_len + TextSize::new(1),
        };
        self.examine(end);
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.examine_chars(1);
        self.chars.as_str().is_empty()
    }

    pub(crate) fn pos_within_token(&self) -> TextSize {
        self.len - self.remaining()
    }

    pub(crate) fn reset_pos_within_token(&mut self) {
        self.len = self.remaining();
    }

    pub(crate) fn peek(&self) -> char {
        self.examine_chars(1);
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn second(&self) -> char {
        self.examine_chars(2);
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn matches(&self, c: char) -> bool {
        self.peek() == c
    }

    pub(crate) fn advance(&mut self) -> char {
        self.examine_chars(1);
        match self.chars.next() {
            Some(c) => {
                if c == '\n' {
                    self.line += 1;
                    self.line_start = self.offset();
                }
                c
            }
            None => EOF_CHAR,
        }
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool + Copy) {
        while !self.is_eof() && f(self.peek()) {
            self.advance();
        }
    }

    /// Advances over `len` bytes, which must end on a char boundary.
    pub(crate) fn advance_bytes(&mut self, len: usize) {
        let target = self.chars.as_str().len() - len;
        while self.chars.as_str().len() > target {
            self.advance();
        }
    }
}
