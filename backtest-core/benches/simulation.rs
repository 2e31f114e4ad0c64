use backtest_common::data::{DividendEvent, PricePoint};
use backtest_core::backtest::{
    create_strategy, MetricsCalculator, PortfolioSimulator, SignalGenerator, SimulationConfig,
};
use backtest_core::backtest::strategy::StrategyConfig;
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn synthetic_prices(days: usize) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2010, 1, 4).unwrap();
    (0..days)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + t * 0.05 + (t / 7.0).sin() * 8.0 + (t / 31.0).cos() * 5.0;
            PricePoint::new(start + Duration::days(i as i64), close)
        })
        .collect()
}

fn quarterly_dividends(prices: &[PricePoint]) -> Vec<DividendEvent> {
    prices
        .iter()
        .step_by(63)
        .skip(1)
        .map(|p| DividendEvent::new(p.date, 0.5))
        .collect()
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    let strategy = create_strategy("buy_the_dip", &StrategyConfig::default()).unwrap();
    let simulator = PortfolioSimulator::new(
        SimulationConfig::new(1_000_000.0, 1_000.0)
            .with_transaction_cost_pct(0.001)
            .with_cash_interest_rate_pct(0.02),
    );

    for years in [1usize, 5, 20].iter() {
        let prices = synthetic_prices(years * 252);
        let dividends = quarterly_dividends(&prices);
        let signals = strategy.generate_signals(&prices);

        group.bench_with_input(BenchmarkId::from_parameter(years), &prices, |b, prices| {
            b.iter(|| {
                simulator
                    .run(black_box(prices), black_box(&signals), black_box(&dividends))
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let prices = synthetic_prices(20 * 252);
    let dates: Vec<NaiveDate> = prices.iter().map(|p| p.date).collect();
    let values: Vec<f64> = prices.iter().map(|p| p.adjusted_close).collect();
    let calculator = MetricsCalculator::new().with_risk_free_rate(0.02);

    c.bench_function("metrics_20y", |b| {
        b.iter(|| calculator.calculate(black_box(&dates), black_box(&values)));
    });
}

criterion_group!(benches, bench_simulation, bench_metrics);
criterion_main!(benches);
