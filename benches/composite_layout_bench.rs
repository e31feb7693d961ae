use chart_compose::api::{CompositeChart, CompositeChartConfig, PieChart, PieChartConfig};
use chart_compose::core::{DomainOverrides, PieDatum, Series, SeriesKind, YAxis, resolve_domains};
use chart_compose::render::NullRenderer;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn mixed_series(points: usize) -> Vec<Series> {
    let wave = |phase: f64| -> Vec<(f64, f64)> {
        (0..points)
            .map(|i| {
                let x = i as f64;
                (x, 50.0 + 25.0 * (x * 0.05 + phase).sin())
            })
            .collect()
    };
    vec![
        Series::new("rain", SeriesKind::Bar, YAxis::Primary).with_points(&wave(0.0)),
        Series::new("snow", SeriesKind::Bar, YAxis::Primary).with_points(&wave(0.7)),
        Series::new("temp", SeriesKind::Line, YAxis::Secondary).with_points(&wave(1.3)),
        Series::new("load", SeriesKind::Area, YAxis::Primary).with_points(&wave(2.1)),
        Series::new("idle", SeriesKind::Area, YAxis::Primary).with_points(&wave(2.9)),
    ]
}

fn bench_resolve_domains_10k(c: &mut Criterion) {
    let data = mixed_series(10_000);
    c.bench_function("resolve_domains_10k", |b| {
        b.iter(|| resolve_domains(black_box(&data), DomainOverrides::default(), true))
    });
}

fn bench_composite_render_500(c: &mut Criterion) {
    let mut chart = CompositeChart::new(NullRenderer::default(), CompositeChartConfig::default())
        .expect("chart init");
    chart.set_data(mixed_series(500));

    c.bench_function("composite_render_500", |b| {
        b.iter(|| {
            let summary = chart.render().expect("render");
            black_box(summary.drawn.len());
        })
    });
}

fn bench_pie_render_40(c: &mut Criterion) {
    let mut chart =
        PieChart::new(NullRenderer::default(), PieChartConfig::default()).expect("pie init");
    chart.set_data(
        (0..40)
            .map(|i| PieDatum::new(format!("slice {i}"), f64::from(i % 7 + 1)))
            .collect(),
    );

    c.bench_function("pie_render_40", |b| {
        b.iter(|| {
            let summary = chart.render().expect("render");
            black_box(summary.arcs.len());
        })
    });
}

criterion_group!(
    benches,
    bench_resolve_domains_10k,
    bench_composite_render_500,
    bench_pie_render_40
);
criterion_main!(benches);
