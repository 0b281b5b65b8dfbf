use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use isodatetime::{parse_duration, parse_point, parse_recurrence, CalendarMode, Config};

fn bench_day_counting(c: &mut Criterion) {
    let mut group = c.benchmark_group("day_number");
    for mode in [CalendarMode::Gregorian, CalendarMode::Day360] {
        group.bench_with_input(BenchmarkId::from_parameter(mode), &mode, |b, &mode| {
            b.iter(|| {
                let mut total = 0i64;
                for year in (-4000..4000).step_by(37) {
                    let day = mode.day_number(black_box(year), 200);
                    total += mode.ordinal_from_day_number(day).0;
                }
                total
            })
        });
    }
    group.finish();
}

fn bench_parsing(c: &mut Criterion) {
    let config = Config::default().with_expanded_year_digits(2);
    let mut group = c.benchmark_group("parse");
    for text in ["+002020-02-29T12:30:45,5+05:30", "+002020W095T1230Z", "--0229", "T-12:34,45"] {
        group.bench_with_input(BenchmarkId::from_parameter(text), text, |b, text| {
            b.iter(|| parse_point(black_box(text), &config))
        });
    }
    group.bench_function("duration", |b| b.iter(|| parse_duration(black_box("P1Y2M3DT4H5M6,5S"))));
    group.finish();
}

fn bench_recurrence(c: &mut Criterion) {
    let config = Config::default();
    let recurrence = parse_recurrence("R/2020-01-31T00Z/P1M", None, &config).unwrap();
    let reference = parse_point("2520-06-15T00Z", &config).unwrap();
    c.bench_function("recurrence_get_next", |b| {
        b.iter(|| recurrence.get_next(black_box(&reference)))
    });
}

criterion_group!(benches, bench_day_counting, bench_parsing, bench_recurrence);
criterion_main!(benches);
