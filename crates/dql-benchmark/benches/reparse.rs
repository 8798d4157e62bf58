use std::hint::black_box;

use codspeed_criterion_compat::{
    BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main,
};
use dql_inputs::{Document, TextEdit};
use dql_parse::{InputEdit, parse};
use text_size::TextSize;

fn statements(count: usize) -> String {
    (0..count)
        .map(|i| format!("SELECT u{i} FROM User u{i} WHERE u{i}.id = {i}\n"))
        .collect()
}

fn benchmark_reparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reparse Benchmark");

    for count in [10, 100, 1000] {
        let text = statements(count);
        let old = parse(&text);
        let offset = text.len() / 2;
        let (new_text, edit) = InputEdit::replace(&text, offset, offset, " ");

        group.bench_with_input(BenchmarkId::new("full", count), &new_text, |b, new_text| {
            b.iter(|| black_box(parse(new_text)));
        });
        group.bench_with_input(BenchmarkId::new("incremental", count), &edit, |b, edit| {
            b.iter(|| black_box(old.reparse(&new_text, edit)));
        });
    }

    group.finish();
}

fn benchmark_typing(c: &mut Criterion) {
    let text = statements(100);

    c.bench_function("type_and_erase", |b| {
        b.iter_batched(
            || Document::new("bench.dql", text.as_str()),
            |mut document| {
                let at = text.find("WHERE u50").unwrap_or(0);
                for (i, ch) in "u50.age > 18 AND ".chars().enumerate() {
                    let offset = TextSize::new((at + 6 + i) as u32);
                    document.apply_edit(TextEdit::insert(offset, ch)).unwrap();
                }
                black_box(document)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, benchmark_reparse, benchmark_typing);
criterion_main!(benches);
