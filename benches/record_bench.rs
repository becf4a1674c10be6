use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use struct_factory::{Key, RecordFactory, RecordSpec, RecordType, Value, fields, tokens};

// ─── Test Data ──────────────────────────────────────────────────────────────

fn make_user_type() -> RecordType {
    RecordFactory::new()
        .define(RecordSpec::new(tokens![id, name, age, score, active, tags]))
        .unwrap()
}

fn make_user_values() -> Vec<Value> {
    vec![
        Value::from("user:abc123"),
        Value::from("Alice"),
        Value::from(28i64),
        Value::from(99.5f64),
        Value::from(true),
        Value::from(vec![Value::from("developer"), Value::from("rust")]),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Defining types
// ═══════════════════════════════════════════════════════════════════════════

fn bench_defining_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("defining_types");
    let factory = RecordFactory::new();

    group.bench_function("anonymous", |b| {
        b.iter(|| factory.define(RecordSpec::new(black_box(tokens![x, y, z]))).unwrap())
    });

    group.bench_function("named (registry write)", |b| {
        b.iter(|| {
            factory
                .define(RecordSpec::new(black_box(tokens!["Bench"; x, y, z])))
                .unwrap()
        })
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Constructing records
// ═══════════════════════════════════════════════════════════════════════════

fn bench_constructing_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("constructing_records");
    let ty = make_user_type();
    let values = make_user_values();

    group.bench_function("positional", |b| {
        b.iter(|| ty.construct(black_box(values.clone())).unwrap())
    });

    let keyword = RecordFactory::new()
        .define(RecordSpec::new(tokens![id, name, age]).keyword_init(true))
        .unwrap();
    let map = fields! { "id" => "user:abc123", "name" => "Alice", "age" => 28i64 };
    group.bench_function("keyword", |b| {
        b.iter(|| keyword.construct_keyword(black_box(map.clone())).unwrap())
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Keyed access
// ═══════════════════════════════════════════════════════════════════════════

fn bench_keyed_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_access");
    group.sample_size(500);

    let ty = make_user_type();
    let mut record = ty.construct(make_user_values()).unwrap();

    group.bench_function("get by position", |b| {
        b.iter(|| black_box(record.get(black_box(2i64)).unwrap().as_i64()))
    });

    group.bench_function("get by name", |b| {
        b.iter(|| black_box(record.get(black_box("age")).unwrap().as_i64()))
    });

    group.bench_function("dig into array", |b| {
        let keys = [Key::from("tags"), Key::from(-1i64)];
        b.iter(|| black_box(record.dig(black_box(keys.clone())).unwrap()))
    });

    group.bench_function("hash_code", |b| b.iter(|| black_box(record.hash_code())));

    group.bench_function("set by name", |b| {
        b.iter(|| record.set(black_box("age"), black_box(29i64)).unwrap())
    });

    group.finish();
}

// ─── Criterion Main ─────────────────────────────────────────────────────────

criterion_group!(
    benches,
    bench_defining_types,
    bench_constructing_records,
    bench_keyed_access,
);
criterion_main!(benches);
