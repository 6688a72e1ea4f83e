use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rlox::prelude::*;

/// A long straight-line program: nested blocks, arithmetic and reassignment.
fn program(blocks: usize) -> String {
    let mut src = String::from("var sum = 0;\nvar label = \"\";\n");

    for i in 0..blocks {
        src.push_str(&format!(
            "{{ var x = {i}; var y = (x * 2 + 1) / 3 - -x; sum = sum + y; label = label + \"#\"; }}\n"
        ));
    }

    src.push_str("var done = sum > 0 == !nil;\n");
    src
}

fn scan(source: &str) {
    let tokens = Scanner::new(source).scan_tokens();
    black_box(tokens);
}

fn parse(source: &str) {
    let statements = parse_source(source).unwrap();
    black_box(statements);
}

fn run(source: &str) {
    let mut globals = Environment::new();
    let status = run_source(&mut globals, source, &mut std::io::sink(), &mut std::io::sink());
    assert_eq!(status.unwrap(), ExitStatus::Ok);
}

fn criterion_benchmark(c: &mut Criterion) {
    let src = program(2_000);

    let mut group = c.benchmark_group("my-benchmark");
    group.sample_size(20);
    group.bench_function("scan", |b| b.iter(|| scan(&src)));
    group.bench_function("parse", |b| b.iter(|| parse(&src)));
    group.bench_function("run", |b| b.iter(|| run(&src)));
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
