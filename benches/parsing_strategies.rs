//! Benchmark suite for comparing processing strategies
//!
//! Compares the synchronous and asynchronous strategies using the divan
//! benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Benchmark Fixtures
//!
//! Three PPD files with mixed credits and debits, some carrying Addenda05:
//! - `benchmark_small.ach` - 100 entries in 2 batches
//! - `benchmark_medium.ach` - 1,000 entries in 10 batches
//! - `benchmark_large.ach` - 10,000 entries in 40 batches

use nacha_engine::cli::StrategyType;
use nacha_engine::strategy::{create_strategy, BatchConfig, Settings};
use std::path::Path;

fn main() {
    divan::main();
}

fn run(strategy_type: StrategyType, fixture: &str) {
    let config = match strategy_type {
        StrategyType::Sync => None,
        StrategyType::Async => Some(BatchConfig::default()),
    };
    let strategy = create_strategy(strategy_type, Settings::default(), config);
    let path = format!("benches/fixtures/benchmark_{}.ach", fixture);
    let mut output = Vec::new();

    let errors = strategy
        .process(Path::new(&path), &mut output)
        .expect("Processing failed");
    assert!(errors.is_empty(), "{}", errors);
}

#[divan::bench(args = ["small", "medium", "large"])]
fn sync_strategy(fixture: &str) {
    run(StrategyType::Sync, fixture);
}

#[divan::bench(args = ["small", "medium", "large"])]
fn async_strategy(fixture: &str) {
    run(StrategyType::Async, fixture);
}
