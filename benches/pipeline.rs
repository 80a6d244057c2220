use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use table_pager::filter::{filter, FilterSpec, Filters};
use table_pager::load::demo_dataset;
use table_pager::sort::{sort, SortState, SortStates};
use table_pager::{Direction, PageStep, Row, TableController};

/// Benchmark the filter stage: a text filter matching ~20% of rows plus a
/// range filter.
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for num_rows in [1_000, 10_000, 100_000] {
        let data = demo_dataset(num_rows);
        let mut filters = Filters::new();
        filters.insert("name".to_string(), FilterSpec::text("ali"));
        filters.insert("score".to_string(), FilterSpec::range(Some(25.0), Some(75.0)));

        group.bench_with_input(BenchmarkId::new("rows", num_rows), &data, |b, data| {
            b.iter(|| black_box(filter(&data.rows, black_box(&filters), &data.columns)));
        });
    }

    group.finish();
}

/// Benchmark stable sorting on a numeric and a text column.
fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for num_rows in [1_000, 10_000, 100_000] {
        let data = demo_dataset(num_rows);
        let rows: Vec<&Row> = data.rows.iter().collect();

        for (label, col) in [("numeric", 3), ("text", 1)] {
            let mut states = SortStates::new();
            states.set(col, SortState::Desc);
            group.bench_with_input(BenchmarkId::new(label, num_rows), &rows, |b, rows| {
                b.iter(|| black_box(sort(black_box(rows), &states)));
            });
        }
    }

    group.finish();
}

/// Benchmark controller transitions that rerun the whole pipeline against
/// ones that only touch the selection.
fn bench_controller(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller");

    for num_rows in [1_000, 10_000, 100_000] {
        let mut ctl = TableController::new(demo_dataset(num_rows), 50).unwrap();
        ctl.set_viewport_height(20);

        group.bench_function(BenchmarkId::new("advance_page", num_rows), |b| {
            b.iter(|| ctl.advance_page(black_box(PageStep::Next)));
        });
        group.bench_function(BenchmarkId::new("cycle_sort", num_rows), |b| {
            b.iter(|| black_box(ctl.cycle_sort("score")));
        });
        group.bench_function(BenchmarkId::new("move_selection", num_rows), |b| {
            b.iter(|| ctl.move_selection(black_box(Direction::Down)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter, bench_sort, bench_controller);
criterion_main!(benches);
