//! Criterion benchmarks for placement_core simulation
//!
//! Run with: cargo bench -p placement_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use placement_core::model::{MonteCarloConfig, SimulationParameters, TaxTiming};
use placement_core::projection::dca_projection;
use placement_core::simulation::{compare_accounts, monte_carlo_simulate, run_simulation};

fn create_params(years: u32) -> SimulationParameters {
    SimulationParameters {
        years,
        ..Default::default()
    }
}

fn bench_single_run(c: &mut Criterion) {
    let params = create_params(30);

    c.bench_function("single_run_30yr", |b| {
        b.iter(|| run_simulation(black_box(&params)))
    });
}

fn bench_comparison(c: &mut Criterion) {
    let params = SimulationParameters {
        tax_timing: TaxTiming::Annual,
        ..create_params(30)
    };

    c.bench_function("compare_accounts_30yr_annual_tax", |b| {
        b.iter(|| compare_accounts(black_box(&params)))
    });
}

fn bench_projection(c: &mut Criterion) {
    let params = create_params(30);

    c.bench_function("dca_projection_30yr", |b| {
        b.iter(|| dca_projection(black_box(&params)))
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    let params = create_params(10);

    for trials in [100, 500, 1000].iter() {
        let mc_config = MonteCarloConfig {
            trials: *trials,
            ..Default::default()
        };

        group.bench_with_input(BenchmarkId::new("trials", trials), trials, |b, _| {
            b.iter(|| monte_carlo_simulate(black_box(&params), black_box(&mc_config)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_run,
    bench_comparison,
    bench_projection,
    bench_monte_carlo
);
criterion_main!(benches);
