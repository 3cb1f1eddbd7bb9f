//! Lexer throughput benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lute_lex::{tokenize, KeywordTable};

const SAMPLE: &str = r#"
# sample workload: a bit of everything
fn fib(n) {
    if n <= 1 { return n }
    return fib(n - 1) + fib(n - 2)
}

struct Point {
    x = 0
    y = 0
    fn len(self) { return self.x * self.x + self.y * self.y }
}

total = 0
for i from 0..100 {
    total = total + fib(i % 10)
}

names = ["ada", "brook", "cleo"]
ages = {"ada": 36, "brook": 29}
message = 'done: ' + "ok\n"
"#;

fn bench_tokenize(c: &mut Criterion) {
    let keywords = KeywordTable::default();

    c.bench_function("tokenize_sample", |b| {
        b.iter(|| tokenize("bench.lute", black_box(SAMPLE), &keywords).unwrap())
    });

    let large = SAMPLE.repeat(100);
    c.bench_function("tokenize_sample_x100", |b| {
        b.iter(|| tokenize("bench.lute", black_box(&large), &keywords).unwrap())
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
