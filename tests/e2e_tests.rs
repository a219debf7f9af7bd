//! End-to-end integration tests
//!
//! These tests run the complete pipeline over ACH fixtures. Each test:
//! 1. Reads input.ach from a fixture directory
//! 2. Assembles and validates it with the selected strategy
//! 3. Writes the per-entry CSV report to a temporary file
//! 4. Compares the report with expected.csv and checks the error count
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Valid files with one and several batches
//! - Returned entries with Addenda99
//! - Unwrapped files with every record on one line
//! - Control total mismatches, missing wrappers and short records
//!
//! Each test is run twice: once with the synchronous strategy and once with
//! the async strategy.

#[cfg(test)]
mod tests {
    use nacha_engine::cli::{OutputFormat, StrategyType};
    use nacha_engine::io::read_str;
    use nacha_engine::strategy::{create_strategy, BatchConfig, Settings};
    use nacha_engine::types::{FileError, ValidateOpts};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    fn config(strategy_type: StrategyType) -> Option<BatchConfig> {
        match strategy_type {
            StrategyType::Sync => None,
            StrategyType::Async => Some(BatchConfig::new(3, 2)),
        }
    }

    /// Run a fixture and compare the CSV report with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if fixture files cannot be read, the report differs from
    /// expected.csv, or the number of accumulated errors differs.
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType, expected_errors: usize) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.ach", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        let strategy = create_strategy(strategy_type, Settings::default(), config(strategy_type));
        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        let errors = strategy
            .process(Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to process {}: {}", fixture_name, e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
        assert_eq!(
            errors.len(),
            expected_errors,
            "Error count mismatch for fixture: {} (strategy: {:?})\n{}",
            fixture_name,
            strategy_type,
            errors
        );
    }

    #[rstest]
    #[case("single_ppd_credit", 0)]
    #[case("multiple_batches", 0)]
    #[case("return_entries", 0)]
    #[case("unwrapped_lines", 0)]
    #[case("bad_entry_hash", 1)]
    #[case("missing_wrappers", 2)]
    #[case("short_record", 3)]
    fn test_fixtures(
        #[case] fixture: &str,
        #[case] expected_errors: usize,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy, expected_errors);
    }

    /// Re-serializing a valid fixture reproduces it byte for byte
    #[rstest]
    #[case("multiple_batches")]
    #[case("return_entries")]
    fn test_ach_round_trip(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy_type: StrategyType,
    ) {
        let input_path = format!("tests/fixtures/{}/input.ach", fixture);
        let settings = Settings {
            format: OutputFormat::Ach,
            ..Settings::default()
        };
        let strategy = create_strategy(strategy_type, settings, config(strategy_type));
        let mut output = Vec::new();

        let errors = strategy.process(Path::new(&input_path), &mut output).unwrap();
        assert!(errors.is_empty(), "{}", errors);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            fs::read_to_string(&input_path).unwrap()
        );
    }

    #[test]
    fn test_missing_wrappers_are_the_only_errors() {
        let input = fs::read_to_string("tests/fixtures/missing_wrappers/input.ach").unwrap();
        let outcome = read_str(&input, ValidateOpts::default());
        assert!(outcome.errors.contains_file_error(&FileError::FileHeader));
        assert!(outcome.errors.contains_file_error(&FileError::FileControl));
        assert_eq!(outcome.file.batches.len(), 1);
        assert_eq!(outcome.file.entry_count(), 1);
    }

    #[test]
    fn test_json_report_lists_every_batch() {
        let settings = Settings {
            format: OutputFormat::Json,
            ..Settings::default()
        };
        let strategy = create_strategy(StrategyType::Sync, settings, None);
        let mut output = Vec::new();
        strategy
            .process(Path::new("tests/fixtures/multiple_batches/input.ach"), &mut output)
            .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let batches = json["batches"].as_array().unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1]["header"]["standard_entry_class_code"], "CCD");
    }
}
