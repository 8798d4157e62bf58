mod common;

use dql_parse::{InputEdit, Parse, parse};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SNIPPETS: &[&str] = &[" ", "x", "(", ")", "'", ",", "\n", "SELECT ", "WHERE ", " AND u.id = 1", "/*", "*/"];

#[track_caller]
fn check(old: &Parse, start: usize, old_end: usize, insert: &str) -> Parse {
    let (new_text, edit) = InputEdit::replace(old.text(), start, old_end, insert);
    let incremental = old.reparse(&new_text, &edit);
    let full = parse(&new_text);

    let context = || format!("{:?} -> {new_text:?}", old.text());
    assert_eq!(incremental.debug_dump(), full.debug_dump(), "{}", context());
    assert_eq!(incremental.diagnostics(), full.diagnostics(), "{}", context());
    incremental.validate().unwrap_or_else(|err| panic!("{}: {err}", context()));
    incremental
}

#[test]
fn deleting_any_byte() {
    for text in common::corpus() {
        let old = parse(text);
        for offset in 0..text.len() {
            if text.is_char_boundary(offset) && text.is_char_boundary(offset + 1) {
                check(&old, offset, offset + 1, "");
            }
        }
    }
}

#[test]
fn inserting_at_any_offset() {
    for text in common::corpus() {
        let old = parse(text);
        for offset in 0..=text.len() {
            for insert in [" ", "x", "(", "'", "SELECT ", ")"] {
                check(&old, offset, offset, insert);
            }
        }
    }
}

#[test]
fn replacing_whole_statements() {
    let text = common::VALID[9];
    let old = parse(text);
    let second = text.find("DELETE").unwrap();
    let third = text.find("UPDATE").unwrap();

    check(&old, second, third, "");
    check(&old, second, third, "SELECT s FROM Session s WHERE\n");
    check(&old, 0, text.len(), common::VALID[0]);
    check(&old, 0, text.len(), "");
}

#[test]
fn random_edit_sequences() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..64 {
        let text = common::VALID[round % common::VALID.len()];
        let mut current = parse(text);

        for _ in 0..16 {
            let len = current.text().len();
            let start = rng.gen_range(0..=len);
            let old_end = (start + rng.gen_range(0..8)).min(len);
            let insert = SNIPPETS[rng.gen_range(0..SNIPPETS.len())];
            current = check(&current, start, old_end, insert);
        }
    }
}
