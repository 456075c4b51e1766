use chrono::{NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use urania::chart::{BirthProfile, NatalChartAssembler};
use urania::ephemeris::{AnalyticEphemeris, EphemerisSource, GeoLocation, PositionResolver, NATAL_BODIES};
use urania::houses::placidus::placidus_houses;
use urania::time::JulianDay;

fn bench_resolve_positions(c: &mut Criterion) {
    let source = AnalyticEphemeris::new();
    let resolver = PositionResolver::new(&source);

    c.bench_function("resolve_natal_bodies", |b| {
        b.iter(|| resolver.resolve(black_box(JulianDay(2_451_545.0)), black_box(NATAL_BODIES)))
    });
}

fn bench_placidus(c: &mut Criterion) {
    c.bench_function("placidus_houses", |b| {
        b.iter(|| placidus_houses(black_box(211.0), black_box(55.7558), black_box(23.4393)))
    });

    let source = AnalyticEphemeris::new();
    let location = GeoLocation::new(55.7558, 37.6173, 156.0);
    c.bench_function("source_houses", |b| {
        b.iter(|| source.houses(black_box(JulianDay(2_460_000.5)), black_box(&location)))
    });
}

fn bench_natal_chart(c: &mut Criterion) {
    let source = AnalyticEphemeris::new();
    let assembler = NatalChartAssembler::default();
    let profile = BirthProfile::new(
        NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
        NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        GeoLocation::new(55.7558, 37.6173, 156.0),
        240,
    )
    .unwrap();

    c.bench_function("assemble_natal_chart", |b| {
        b.iter(|| assembler.assemble(&source, black_box(&profile)))
    });
}

criterion_group!(benches, bench_resolve_positions, bench_placidus, bench_natal_chart);
criterion_main!(benches);
