//! NACHA ACH Engine CLI
//!
//! Command-line interface for reading and validating NACHA ACH files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- payroll.ach > entries.csv
//! cargo run -- --format json payroll.ach > payroll.json
//! cargo run -- --strategy async --max-concurrent 8 payroll.ach > entries.csv
//! cargo run -- --allow-missing-header --allow-missing-control fragment.ach
//! ```
//!
//! The program reads the input file, validates it with the selected
//! strategy and writes the requested output to stdout. Errors are logged to
//! stderr; set `RUST_LOG` to override the level chosen by `-q`/`-v`.
//!
//! # Exit Codes
//!
//! - 0: The file is valid
//! - 1: Validation errors were found, or the file could not be read

use nacha_engine::cli;
use nacha_engine::strategy::{self, Settings};
use std::process;

fn main() {
    let args = cli::parse_args();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        let settings = Settings {
            opts: args.to_validate_opts(),
            format: args.format,
        };
        strategy::create_strategy(args.strategy, settings, config)
    };

    let mut output = std::io::stdout();
    match strategy.process(&args.input_file, &mut output) {
        Ok(errors) if errors.is_empty() => {}
        Ok(errors) => {
            log::error!("{} validation errors in {}", errors.len(), args.input_file.display());
            process::exit(1);
        }
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
