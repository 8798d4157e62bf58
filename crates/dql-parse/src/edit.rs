/// Zero-based line and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The point of byte `offset` in `text`.
    pub fn of(text: &str, offset: usize) -> Self {
        let before = &text[..offset];
        let row = before.bytes().filter(|&byte| byte == b'\n').count();
        let column = match before.rfind('\n') {
            Some(newline) => offset - newline - 1,
            None => offset,
        };
        Self { row, column }
    }
}

/// Describes how `old_end_byte - start_byte` bytes at `start_byte` were
/// replaced by `new_end_byte - start_byte` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
    pub start_point: Point,
    pub old_end_point: Point,
    pub new_end_point: Point,
}

impl InputEdit {
    /// Replaces `start..old_end` of `old_text` with `insert`, returning the new
    /// text together with the matching edit.
    pub fn replace(old_text: &str, start: usize, old_end: usize, insert: &str) -> (String, Self) {
        let mut new_text = String::with_capacity(old_text.len() - (old_end - start) + insert.len());
        new_text.push_str(&old_text[..start]);
        new_text.push_str(insert);
        new_text.push_str(&old_text[old_end..]);

        let new_end = start + insert.len();
        let edit = Self {
            start_byte: start,
            old_end_byte: old_end,
            new_end_byte: new_end,
            start_point: Point::of(old_text, start),
            old_end_point: Point::of(old_text, old_end),
            new_end_point: Point::of(&new_text, new_end),
        };
        (new_text, edit)
    }

    /// Whether the edit can describe the change from `old` to `new`: the
    /// offsets are ordered and in bounds, and the text outside the edited
    /// range is unchanged.
    pub(crate) fn is_consistent(&self, old: &str, new: &str) -> bool {
        let Self { start_byte: start, old_end_byte: old_end, new_end_byte: new_end, .. } = *self;

        start <= old_end
            && start <= new_end
            && old_end <= old.len()
            && new_end <= new.len()
            && old.len() - old_end == new.len() - new_end
            && old.is_char_boundary(start)
            && new.is_char_boundary(start)
            && old.is_char_boundary(old_end)
            && new.is_char_boundary(new_end)
            && old.as_bytes()[..start] == new.as_bytes()[..start]
            && old.as_bytes()[old_end..] == new.as_bytes()[new_end..]
    }
}
