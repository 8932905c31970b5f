// File: crates/chart-core/benches/recompute_bench.rs
// Summary: Benchmarks geometry recompute at two series sizes and a resize storm through the observer.

use std::rc::Rc;

use chart_core::{compute_geometry, BarChart, BarChartConfig, LayoutHost, ObservedBox, SizeObserver};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn series(n: usize) -> Vec<f64> {
    (0..n).map(|i| ((i as f64) * 0.01).sin() * 70.0 + 80.0).collect()
}

fn bench_geometry(c: &mut Criterion) {
    let cfg = BarChartConfig::default();
    let mut group = c.benchmark_group("compute_geometry");
    for &n in &[100usize, 10_000usize] {
        let data = series(n);
        group.bench_function(format!("bars_{n}"), |b| {
            b.iter(|| black_box(compute_geometry(&data, Some(ObservedBox::new(1024.0, 480.0)), &cfg)));
        });
    }
    group.finish();
}

fn bench_resize_storm(c: &mut Criterion) {
    c.bench_function("resize_storm_1000_bars", |b| {
        let host = Rc::new(LayoutHost::new());
        let el = host.mount();
        let chart = Rc::new(std::cell::RefCell::new(BarChart::default().with_data(series(1000))));
        let mut observer = SizeObserver::with_listener(Rc::clone(&host), Rc::clone(&chart));
        observer.attach(Some(el)).expect("attach");
        let mut w = 400.0;
        b.iter(|| {
            for _ in 0..16 {
                w = if w > 1600.0 { 400.0 } else { w + 7.0 };
                host.resize(el, ObservedBox::new(w, 300.0)).expect("resize");
            }
            black_box(host.flush());
        });
        observer.dispose();
    });
}

criterion_group!(benches, bench_geometry, bench_resize_storm);
criterion_main!(benches);
