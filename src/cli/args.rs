use crate::strategy::BatchConfig;
use crate::types::ValidateOpts;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Parse, validate and report on NACHA ACH files
#[derive(Parser, Debug)]
#[command(name = "nacha-engine")]
#[command(about = "Parse, validate and report on NACHA ACH files", long_about = None)]
pub struct CliArgs {
    /// Input ACH file path
    #[arg(value_name = "INPUT", help = "Path to the input ACH file")]
    pub input_file: PathBuf,

    /// Parsing strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Parsing strategy: 'sync' for synchronous or 'async' for concurrent batch validation"
    )]
    pub strategy: StrategyType,

    /// Number of lines read per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of lines read per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent batch validations (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of batches validated concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "csv")]
    pub format: OutputFormat,

    /// Do not report a missing File Header
    #[arg(long = "allow-missing-header")]
    pub allow_missing_header: bool,

    /// Do not report a missing File Control
    #[arg(long = "allow-missing-control")]
    pub allow_missing_control: bool,

    /// Accept return reason codes outside the NACHA dictionary
    #[arg(long = "custom-return-codes")]
    pub custom_return_codes: bool,

    /// Skip immediate origin checks
    #[arg(long = "bypass-origin")]
    pub bypass_origin: bool,

    /// Skip immediate destination checks
    #[arg(long = "bypass-destination")]
    pub bypass_destination: bool,

    /// Allow batch header and control service class codes to differ
    #[arg(long = "unequal-service-class")]
    pub unequal_service_class: bool,

    /// Parse without validating
    #[arg(long = "skip-validation")]
    pub skip_validation: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose", conflicts_with = "quiet")]
    pub verbose: bool,

    /// Log only warnings and errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Available parsing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Output written to stdout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One row per entry
    #[default]
    Csv,
    /// The full record tree
    Json,
    /// The file re-serialized in NACHA format
    Ach,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Falls back to defaults for anything not given; zero values are
    /// replaced by defaults with a logged warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Validation overrides selected by flags
    pub fn to_validate_opts(&self) -> ValidateOpts {
        ValidateOpts {
            skip_all: self.skip_validation,
            bypass_origin_validation: self.bypass_origin,
            bypass_destination_validation: self.bypass_destination,
            custom_return_codes: self.custom_return_codes,
            unequal_service_class_code: self.unequal_service_class,
            allow_missing_file_header: self.allow_missing_header,
            allow_missing_file_control: self.allow_missing_control,
            ..ValidateOpts::default()
        }
    }

    /// Log filter implied by `--quiet` / `--verbose`
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Warn
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.ach"], StrategyType::Sync)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.ach"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.ach"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::default_format(&["program", "input.ach"], OutputFormat::Csv)]
    #[case::json(&["program", "--format", "json", "input.ach"], OutputFormat::Json)]
    #[case::ach(&["program", "--format", "ach", "input.ach"], OutputFormat::Ach)]
    fn test_format_parsing(#[case] args: &[&str], #[case] expected: OutputFormat) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.format, expected);
    }

    #[rstest]
    #[case::batch_size(&["program", "--batch-size", "2000", "input.ach"], Some(2000), None)]
    #[case::max_concurrent(&["program", "--max-concurrent", "8", "input.ach"], None, Some(8))]
    #[case::no_options(&["program", "input.ach"], None, None)]
    #[case::all_options(
        &["program", "--strategy", "async", "--batch-size", "2000", "--max-concurrent", "8", "input.ach"],
        Some(2000),
        Some(8)
    )]
    fn test_config_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_concurrent: Option<usize>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_concurrent_batches, max_concurrent);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.ach"], 1000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "input.ach"], 1000, 8)]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.ach"], 1000, num_cpus::get())]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.ach"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();
        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[test]
    fn test_validation_flags() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--allow-missing-header",
            "--allow-missing-control",
            "--custom-return-codes",
            "--unequal-service-class",
            "input.ach",
        ])
        .unwrap();
        let opts = parsed.to_validate_opts();
        assert!(opts.allow_missing_file_header);
        assert!(opts.allow_missing_file_control);
        assert!(opts.custom_return_codes);
        assert!(opts.unequal_service_class_code);
        assert!(!opts.skip_all);
        assert!(!opts.bypass_origin_validation);
    }

    #[rstest]
    #[case::default(&["program", "input.ach"], LevelFilter::Info)]
    #[case::quiet(&["program", "-q", "input.ach"], LevelFilter::Warn)]
    #[case::verbose(&["program", "--verbose", "input.ach"], LevelFilter::Debug)]
    fn test_log_level(#[case] args: &[&str], #[case] expected: LevelFilter) {
        assert_eq!(CliArgs::try_parse_from(args).unwrap().log_level(), expected);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.ach"])]
    #[case::invalid_format(&["program", "--format", "xml", "input.ach"])]
    #[case::quiet_and_verbose(&["program", "-q", "-v", "input.ach"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
