//! Criterion benchmarks for the analysis hot paths.
//!
//! 1. Full panel precompute (the default indicator set) over growing series
//! 2. Individual recursive indicators (KDJ, MACD)
//! 3. Batch precompute across symbols
//! 4. Limit-up aggregation over a large pool

use asharelab_core::config::AnalysisConfig;
use asharelab_core::domain::{LimitUpRecord, PriceBar};
use asharelab_core::engine::{compute_panel_batch, IndicatorPanel};
use asharelab_core::indicators::{Indicator, Kdj, Macd};
use asharelab_core::limitup::{explode_reason_tags, promotion_table, rank_by_streak};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::{BTreeSet, HashMap};

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceBar {
                symbol: "600519".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn make_pool(n: usize) -> Vec<LimitUpRecord> {
    let tags = ["AI", "芯片", "光伏", "军工", "低空经济"];
    (0..n)
        .map(|i| LimitUpRecord {
            date: chrono::NaiveDate::from_ymd_opt(2024, 10, 22).unwrap(),
            symbol: format!("{:06}", 600000 + i),
            display_name: format!("股票{i}"),
            streak_length: (i % 7 + 1) as u32,
            reason_tags: [tags[i % tags.len()], tags[(i + 1) % tags.len()]]
                .iter()
                .map(|t| t.to_string())
                .collect::<BTreeSet<_>>(),
        })
        .collect()
}

fn bench_panel_precompute(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let indicators = config.panel_indicators();

    let mut group = c.benchmark_group("panel_precompute");
    for n in [250, 1000, 2500] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| IndicatorPanel::compute(black_box(bars), &indicators).unwrap());
        });
    }
    group.finish();
}

fn bench_recursive_indicators(c: &mut Criterion) {
    let bars = make_bars(2000);
    let kdj = Kdj::k(9, 3, 3);
    let macd = Macd::histogram(12, 26, 9);

    c.bench_function("kdj_k_2000_bars", |b| {
        b.iter(|| kdj.compute(black_box(&bars)));
    });
    c.bench_function("macd_hist_2000_bars", |b| {
        b.iter(|| macd.compute(black_box(&bars)));
    });
}

fn bench_batch_precompute(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let indicators = config.panel_indicators();

    let mut bars_by_symbol = HashMap::new();
    for i in 0..8 {
        bars_by_symbol.insert(format!("{:06}", 600000 + i), make_bars(1000));
    }

    c.bench_function("batch_8_symbols_1000_bars", |b| {
        b.iter(|| compute_panel_batch(black_box(&bars_by_symbol), &indicators).unwrap());
    });
}

fn bench_limit_up_aggregation(c: &mut Criterion) {
    let today = make_pool(5000);
    let yesterday = make_pool(4500);

    c.bench_function("explode_reason_tags_5000", |b| {
        b.iter(|| explode_reason_tags(black_box(&today)));
    });
    c.bench_function("rank_by_streak_5000", |b| {
        b.iter(|| rank_by_streak(black_box(&today)));
    });
    c.bench_function("promotion_table_5000", |b| {
        b.iter(|| promotion_table(black_box(&today), black_box(&yesterday)));
    });
}

criterion_group!(
    benches,
    bench_panel_precompute,
    bench_recursive_indicators,
    bench_batch_precompute,
    bench_limit_up_aggregation
);
criterion_main!(benches);
