//! Structural search over syntax trees.
//!
//! Patterns are S-expressions over node kinds: `(join (path_expression))`
//! matches a `JOIN` node that has a `PATH_EXPRESSION` somewhere below it.
//! Kind names are case-insensitive and `_` matches any node.

use std::str::FromStr;

use text_size::TextSize;

use crate::{SyntaxKind, SyntaxNode, SyntaxSet};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("unexpected end of pattern")]
    UnexpectedEnd,
    #[error("unknown node kind `{0}`")]
    UnknownKind(String),
    #[error("`{0}` is a token kind, patterns match nodes")]
    TokenKind(String),
    #[error("unexpected `{found}` at byte {offset}")]
    Unexpected { found: char, offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    kind: Option<SyntaxKind>,
    children: Vec<Pattern>,
}

impl Pattern {
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let mut parser = PatternParser { source, pos: 0 };
        let pattern = parser.pattern()?;
        parser.skip_whitespace();
        match parser.peek() {
            None => Ok(pattern),
            Some(found) => Err(PatternError::Unexpected { found, offset: parser.pos }),
        }
    }

    /// `None` for the `_` wildcard.
    pub fn kind(&self) -> Option<SyntaxKind> {
        self.kind
    }

    pub fn children(&self) -> &[Pattern] {
        &self.children
    }

    /// `true` if `node` has this pattern's kind and every child pattern
    /// matches some node strictly below it.
    pub fn matches(&self, node: SyntaxNode<'_>) -> bool {
        if self.kind.is_some_and(|kind| kind != node.kind()) {
            return false;
        }

        self.children
            .iter()
            .all(|child| node.descendants().skip(1).any(|descendant| child.matches(descendant)))
    }

    /// Every match under `root`, `root` included, in preorder.
    pub fn find_all<'a>(&self, root: SyntaxNode<'a>) -> Vec<SyntaxNode<'a>> {
        root.descendants().filter(|&node| self.matches(node)).collect()
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Innermost node of one of `kinds` that encloses `offset`.
pub fn find_enclosing<'a>(
    root: SyntaxNode<'a>,
    offset: TextSize,
    kinds: &SyntaxSet,
) -> Option<SyntaxNode<'a>> {
    root.node_at_offset(offset)?.ancestors().find(|node| kinds.contains(node.kind()))
}

struct PatternParser<'s> {
    source: &'s str,
    pos: usize,
}

impl PatternParser<'_> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn pattern(&mut self) -> Result<Pattern, PatternError> {
        self.skip_whitespace();
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let kind = self.name()?;
                let mut children = Vec::new();
                loop {
                    self.skip_whitespace();
                    match self.peek() {
                        Some(')') => {
                            self.pos += 1;
                            return Ok(Pattern { kind, children });
                        }
                        Some(_) => children.push(self.pattern()?),
                        None => return Err(PatternError::UnexpectedEnd),
                    }
                }
            }
            Some(_) => Ok(Pattern { kind: self.name()?, children: Vec::new() }),
            None => Err(PatternError::UnexpectedEnd),
        }
    }

    fn name(&mut self) -> Result<Option<SyntaxKind>, PatternError> {
        self.skip_whitespace();
        let rest = &self.source[self.pos..];
        let len = rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(rest.len());
        if len == 0 {
            return match rest.chars().next() {
                Some(found) => Err(PatternError::Unexpected { found, offset: self.pos }),
                None => Err(PatternError::UnexpectedEnd),
            };
        }

        let name = &rest[..len];
        self.pos += len;
        if name == "_" {
            return Ok(None);
        }

        match SyntaxKind::from_name(name) {
            Some(kind) if kind.is_node() => Ok(Some(kind)),
            Some(_) => Err(PatternError::TokenKind(name.to_owned())),
            None => Err(PatternError::UnknownKind(name.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Pattern, PatternError};
    use crate::SyntaxKind;

    #[test]
    fn parses_nested_patterns() {
        let pattern = Pattern::parse(" (join (path_expression) _) ").unwrap();
        assert_eq!(pattern.kind(), Some(SyntaxKind::JOIN));
        assert_eq!(pattern.children().len(), 2);
        assert_eq!(pattern.children()[0].kind(), Some(SyntaxKind::PATH_EXPRESSION));
        assert_eq!(pattern.children()[1].kind(), None);

        let bare: Pattern = "where_clause".parse().unwrap();
        assert_eq!(bare.kind(), Some(SyntaxKind::WHERE_CLAUSE));
    }

    #[test]
    fn reports_errors() {
        assert_eq!(Pattern::parse("(join"), Err(PatternError::UnexpectedEnd));
        assert_eq!(Pattern::parse(""), Err(PatternError::UnexpectedEnd));
        assert_eq!(Pattern::parse("(joins)"), Err(PatternError::UnknownKind("joins".to_owned())));
        assert_eq!(Pattern::parse("(ident)"), Err(PatternError::TokenKind("ident".to_owned())));
        assert_eq!(
            Pattern::parse("(join))"),
            Err(PatternError::Unexpected { found: ')', offset: 6 })
        );
        assert_eq!(Pattern::parse("()"), Err(PatternError::Unexpected { found: ')', offset: 1 }));
    }
}
