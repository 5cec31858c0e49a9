use astrotime::time::convert;
use astrotime::{DateTime, EpochCount, Instant, Scale};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn conversion_bench(c: &mut Criterion) {
    let post_epoch = EpochCount::After(600_000_000_000_000_000);
    let pre_epoch = EpochCount::Before(800_000_000_000_000_000);

    let mut group = c.benchmark_group("convert");
    group.bench_function("utc_to_tt_post_epoch", |b| {
        b.iter(|| convert(black_box(post_epoch), Scale::UTC, Scale::TT))
    });
    group.bench_function("tt_to_utc_pre_epoch", |b| {
        b.iter(|| convert(black_box(pre_epoch), Scale::TT, Scale::UTC))
    });
    group.bench_function("gpst_to_tai", |b| {
        b.iter(|| convert(black_box(post_epoch), Scale::GPST, Scale::TAI))
    });
    group.finish();
}

fn calendar_bench(c: &mut Criterion) {
    let date_time = DateTime::new(2016, 12, 31, 23, 59, 59, 123, 456, 789).unwrap();
    let instant = Instant::from_date_time(&date_time, Scale::UTC).unwrap();

    let mut group = c.benchmark_group("calendar");
    group.bench_function("from_date_time_utc", |b| {
        b.iter(|| Instant::from_date_time(black_box(&date_time), Scale::UTC))
    });
    group.bench_function("to_date_time_utc", |b| {
        b.iter(|| black_box(instant).to_date_time(Scale::UTC))
    });
    group.bench_function("julian_date_tt", |b| {
        b.iter(|| black_box(instant).julian_date(Scale::TT))
    });
    group.finish();
}

criterion_group!(benches, conversion_bench, calendar_bench);
criterion_main!(benches);
