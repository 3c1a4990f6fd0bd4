use criterion::{criterion_group, criterion_main, Criterion};
use errors::LoxErrors;
use itertools::Itertools;
use parser::Parser;

pub fn criterion_benchmark(c: &mut Criterion) {
    let source = (0..500)
        .map(|i| format!("(!{i}.5 == -\"s{i}\" /* x /* y */ */ <= {i} * nil) // {i}\n"))
        .join(" != ");

    c.bench_function("scan", |b| {
        b.iter(|| {
            let mut errors = LoxErrors::default();
            let tokens = scanner::tokenize(&source, &mut errors);
            assert!(errors.is_empty());
            tokens
        })
    });

    let tokens = scanner::tokenize(&source, &mut LoxErrors::default());
    c.bench_function("parse", |b| b.iter(|| Parser::new(&tokens).parse().unwrap()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
