//! Benchmarks for tree construction and registry scans.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simtree_core::build_similarity_tree;
use simtree_fingerprint::{Commit, Modification};

fn synthetic_history(n: i64) -> Vec<Commit> {
    const MESSAGES: [&str; 5] = [
        "Fix null pointer in parser",
        "feat: add streaming reader",
        "refactor config loading",
        "docs: update readme",
        "Add tests for lexer",
    ];
    const PATHS: [&str; 4] = ["src/parser.c", "tests/lexer_test.txt", "README.md", "Makefile"];

    (0..n)
        .map(|id| {
            let message = MESSAGES[id as usize % MESSAGES.len()];
            let path = PATHS[id as usize % PATHS.len()];
            let code = "line\n".repeat((id % 17) as usize + 1);
            Commit::new(id, message, 1_700_000_000 + id * 977)
                .with_modification(Modification::new(path, "old\n", code, 1))
        })
        .collect()
}

fn bench_build_tree(c: &mut Criterion) {
    let commits = synthetic_history(200);
    c.bench_function("build_tree_200_commits", |b| {
        b.iter(|| build_similarity_tree(black_box(&commits)).map(|tree| tree.total_commits()))
    });
}

fn bench_precedents(c: &mut Criterion) {
    let commits = synthetic_history(500);
    let tree = build_similarity_tree(&commits).expect("non-empty history");
    c.bench_function("precedents_500_commits", |b| {
        b.iter(|| tree.find_historical_precedents(black_box(250), 10).len())
    });
}

criterion_group!(benches, bench_build_tree, bench_precedents);
criterion_main!(benches);
