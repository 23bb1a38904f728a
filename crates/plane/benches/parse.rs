use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SIMPLE_QUERY: &str = "SELECT id FROM users WHERE active = 1;";
const JOIN_QUERY: &str =
    "SELECT u.id, u.name, o.total FROM users u INNER JOIN orders o ON u.id = o.user_id WHERE o.total > 100 ORDER BY o.total;";
const SUBQUERY: &str =
    "SELECT * FROM (SELECT id, count(id) FROM orders GROUP BY id) totals WHERE totals.id > 10;";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("tokenize_simple", |b| {
        b.iter(|| plane_lexer::tokenize(black_box(SIMPLE_QUERY)))
    });

    c.bench_function("parse_simple", |b| {
        b.iter(|| plane_parser::parse(black_box(SIMPLE_QUERY)))
    });

    c.bench_function("parse_join", |b| {
        b.iter(|| plane_parser::parse(black_box(JOIN_QUERY)))
    });

    c.bench_function("parse_subquery", |b| {
        b.iter(|| plane_parser::parse(black_box(SUBQUERY)))
    });

    c.bench_function("parse_many_statements", |b| {
        let sql = SIMPLE_QUERY.repeat(64);
        b.iter(|| plane_parser::parse(black_box(&sql)))
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
