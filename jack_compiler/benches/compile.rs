use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jack_compiler::{lex::Lexer, Compiler};

const SQUARE: &str = include_str!("../tests/Square.jack");

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("lex square", |b| {
        b.iter(|| {
            let lexer = Lexer::new(black_box(SQUARE));
            black_box(lexer.into_iter().count())
        })
    });

    c.bench_function("compile square", |b| {
        b.iter(|| {
            let mut compiler = Compiler::default();
            black_box(compiler.compile(black_box(SQUARE)).unwrap())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
