use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fieldsql::{
    Condition, InsertRows, Query, Registry, RowMap, Schema, SelectRows, Update, to_row,
};

#[derive(Debug, Default, Clone, Schema)]
struct Event {
    #[orm(column = "ID")]
    id: u64,
    kind: String,
    source: String,
    score: f64,
    note: Option<String>,
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register::<Event>();
    registry
}

fn bench_condition_build(c: &mut Criterion) {
    let registry = registry();
    let f = Event::fields();
    let mut group = c.benchmark_group("query_build/condition");

    for n in [1, 5, 10, 50] {
        let condition = Condition::and((0..n).map(|i| match i % 3 {
            0 => Condition::eq(&f.id, i as u64),
            1 => Condition::prefix(&f.kind, format!("k{i}")),
            _ => Condition::in_list(&f.source, ["a".to_string(), "b".to_string()]),
        }));
        group.bench_with_input(BenchmarkId::from_parameter(n), &condition, |b, condition| {
            b.iter(|| black_box(condition.build(&registry)));
        });
    }

    group.finish();
}

fn bench_select_rows(c: &mut Criterion) {
    let registry = registry();
    let f = Event::fields();
    let q = SelectRows::<Event>::full(&registry, "events")
        .filter(Condition::or([
            Condition::eq(&f.kind, "click".to_string()),
            Condition::gt(&f.score, 0.5),
        ]))
        .order_desc(&f.id)
        .page(3, 50);

    c.bench_function("query_build/select_rows", |b| b.iter(|| black_box(q.build())));
}

fn bench_update(c: &mut Criterion) {
    let registry = registry();
    let f = Event::fields();
    let q = Update::<Event>::new(&registry, "events")
        .set(&f.kind, "view".to_string())
        .set(&f.score, 1.0)
        .set(&f.note, None)
        .filter(Condition::eq(&f.id, 7));

    c.bench_function("query_build/update", |b| b.iter(|| black_box(q.build())));
}

fn bench_insert_rows(c: &mut Criterion) {
    let registry = registry();
    let mut group = c.benchmark_group("query_build/insert_rows");

    for n in [1, 10, 100] {
        let rows: Vec<RowMap> = (0..n)
            .map(|i| {
                let event = Event {
                    id: i,
                    kind: "click".into(),
                    ..Event::default()
                };
                to_row(&registry, &event)
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &rows, |b, rows| {
            b.iter(|| black_box(InsertRows::new("events").rows(rows.clone()).build()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_condition_build,
    bench_select_rows,
    bench_update,
    bench_insert_rows
);
criterion_main!(benches);
