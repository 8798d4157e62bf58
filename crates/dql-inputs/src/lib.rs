//! Open documents: source text kept in sync with its syntax tree.

use camino::{Utf8Path, Utf8PathBuf};
use dql_parse::{InputEdit, NodeCache, Parse, ParserConfig, Point, parse_with, reparse_with};
pub use line_index::{LineCol, LineIndex};
use text_size::{TextRange, TextSize};

/// Replaces `range` of the current text with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub insert: String,
}

impl TextEdit {
    pub fn replace(range: TextRange, insert: impl Into<String>) -> Self {
        Self { range, insert: insert.into() }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::replace(TextRange::empty(offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::replace(range, String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("edit range {range:?} is out of bounds for a document of {len:?} bytes")]
    OutOfBounds { range: TextRange, len: TextSize },
    #[error("edit boundary {offset:?} is not on a character boundary")]
    NotCharBoundary { offset: TextSize },
}

pub struct Document {
    path: Utf8PathBuf,
    text: String,
    line_index: LineIndex,
    parse: Parse,
    cache: NodeCache,
}

impl Document {
    pub fn new(path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        Self::with_config(path, text, &ParserConfig::default())
    }

    pub fn with_config(
        path: impl Into<Utf8PathBuf>,
        text: impl Into<String>,
        config: &ParserConfig,
    ) -> Self {
        let text = text.into();
        let mut cache = NodeCache::new();
        let parse = parse_with(&text, config, &mut cache);
        let line_index = LineIndex::new(&text);

        Self { path: path.into(), text, line_index, parse, cache }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }

    /// Applies `edit` and brings the tree up to date, reusing the parts of
    /// the old tree the edit cannot have affected.
    pub fn apply_edit(&mut self, edit: TextEdit) -> Result<&Parse, EditError> {
        let TextEdit { range, insert } = edit;
        let len = TextSize::of(&self.text);
        if range.end() > len {
            return Err(EditError::OutOfBounds { range, len });
        }
        for offset in [range.start(), range.end()] {
            if !self.text.is_char_boundary(offset.into()) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }

        let start = usize::from(range.start());
        let old_end = usize::from(range.end());
        let start_point = point(self.line_index.line_col(range.start()));
        let old_end_point = point(self.line_index.line_col(range.end()));

        self.text.replace_range(start..old_end, &insert);
        self.line_index = LineIndex::new(&self.text);

        let new_end = start + insert.len();
        let new_end_point = point(self.line_index.line_col(TextSize::new(new_end as u32)));
        let input_edit = InputEdit {
            start_byte: start,
            old_end_byte: old_end,
            new_end_byte: new_end,
            start_point,
            old_end_point,
            new_end_point,
        };

        tracing::debug!(path = %self.path, ?range, inserted = insert.len(), "applying edit");
        self.parse = reparse_with(&self.parse, &self.text, &input_edit, &mut self.cache);
        self.cache.trim();
        Ok(&self.parse)
    }
}

fn point(line_col: LineCol) -> Point {
    Point::new(line_col.line as usize, line_col.col as usize)
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::new(start), TextSize::new(end))
    }

    #[test]
    fn edits_keep_text_and_tree_in_sync() {
        let mut document = Document::new("users.dql", "SELECT u FROM User u\nWHERE u.id = 1\n");
        assert!(!document.parse().has_errors());

        document.apply_edit(TextEdit::replace(range(34, 35), "2 AND u.age >")).unwrap();
        assert_eq!(document.text(), "SELECT u FROM User u\nWHERE u.id = 2 AND u.age >\n");
        assert_eq!(document.parse().text(), document.text());
        assert_eq!(document.parse().debug_dump(), dql_parse::parse(document.text()).debug_dump());
        document.parse().validate().unwrap();

        let errors: Vec<_> = document
            .parse()
            .diagnostics()
            .iter()
            .map(|diagnostic| (document.line_col(diagnostic.range().start()), diagnostic.message()))
            .map(|(at, message)| format!("{}:{}: {message}", at.line, at.col))
            .collect();
        expect![[r#"
            [
                "1:25: expected expression",
            ]
        "#]]
        .assert_debug_eq(&errors);
    }

    #[test]
    fn insert_and_delete() {
        let mut document = Document::new("a.dql", "SELECT u FROM User u");

        document.apply_edit(TextEdit::insert(TextSize::new(20), "\nDELETE FROM Log l")).unwrap();
        assert_eq!(document.parse().root().children().count(), 2);
        assert_eq!(document.line_col(TextSize::new(21)), LineCol { line: 1, col: 0 });

        document.apply_edit(TextEdit::delete(range(0, 21))).unwrap();
        assert_eq!(document.text(), "DELETE FROM Log l");
        assert!(!document.parse().has_errors());
    }

    #[test]
    fn cache_stays_bounded_across_edits() {
        let mut document = Document::new("a.dql", "SELECT u FROM User u WHERE u.id = 0");
        let start = document.text().find('0').unwrap() as u32;
        let mut end = start + 1;

        for i in 1..5000u32 {
            let literal = i.to_string();
            document.apply_edit(TextEdit::replace(range(start, end), literal.as_str())).unwrap();
            end = start + literal.len() as u32;
            assert!(document.cache.len() < 1024, "edit {i}: {} cache entries", document.cache.len());
        }

        assert_eq!(document.text(), "SELECT u FROM User u WHERE u.id = 4999");
        assert!(!document.parse().has_errors());
    }

    #[test]
    fn rejects_bad_ranges() {
        let mut document = Document::new("a.dql", "SELECT 'é' FROM A a");

        let err = document.apply_edit(TextEdit::delete(range(0, 64))).unwrap_err();
        assert_eq!(err, EditError::OutOfBounds { range: range(0, 64), len: TextSize::new(20) });

        let err = document.apply_edit(TextEdit::insert(TextSize::new(9), "x")).unwrap_err();
        assert_eq!(err, EditError::NotCharBoundary { offset: TextSize::new(9) });
        assert_eq!(document.text(), "SELECT 'é' FROM A a");
    }
}
