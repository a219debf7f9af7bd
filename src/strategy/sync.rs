//! Synchronous processing strategy
//!
//! Reads the file line by line through [`Reader`], validating each batch as
//! its control record closes it, then writes the output.
//!
//! # Memory
//!
//! The whole file tree is held in memory; lines are streamed from disk.

use crate::io::reader::Reader;
use crate::io::write_output;
use crate::strategy::{log_outcome, ProcessingStrategy, Settings};
use crate::types::{AchError, ErrorList};
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use nacha_engine::strategy::{ProcessingStrategy, Settings, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(Settings::default());
/// let mut output = io::stdout();
///
/// let errors = strategy.process(Path::new("payroll.ach"), &mut output)
///     .expect("Processing failed");
/// assert!(errors.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    settings: Settings,
}

impl SyncProcessingStrategy {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<ErrorList, AchError> {
        log::debug!("Reading {} synchronously", input_path.display());
        let outcome = Reader::from_path(input_path)?
            .with_validation(self.settings.opts.clone())
            .read()?;

        log_outcome(
            &outcome.errors,
            outcome.file.batches.len(),
            outcome.file.entry_count(),
        );
        write_output(&outcome.file, self.settings.format, output)?;
        Ok(outcome.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::types::{FileError, ValidateOpts};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FILE: [&str; 6] = [
        "101 231380104 1210428822306301200A094101Citadel                Wells Fargo                    ",
        "5220Name on Account                     231380104 PPDPAYROLL         230630   1121042880000001",
        "622231380104123456789        0000025000               Receiver Account Name   1121042880000001",
        "705Vacation pay                                                                    00010000001",
        "82200000020023138010000000000000000000025000231380104                          121042880000001",
        "9000001000001000000020023138010000000000000000000025000                                       ",
    ];

    fn create_temp_ach(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_strategy_processes_valid_file() {
        let file = create_temp_ach(&FILE.join("\n"));
        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let errors = strategy.process(file.path(), &mut output).unwrap();
        assert!(errors.is_empty(), "{}", errors);

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.starts_with("batch,sec,trace"));
        assert!(output_str.contains("Receiver Account Name"));
    }

    #[test]
    fn test_sync_strategy_writes_ach() {
        let file = create_temp_ach(&FILE.join("\n"));
        let strategy = SyncProcessingStrategy::new(Settings {
            format: OutputFormat::Ach,
            ..Settings::default()
        });
        let mut output = Vec::new();

        strategy.process(file.path(), &mut output).unwrap();
        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str.lines().count(), 10);
        assert!(output_str.starts_with(FILE[0]));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.ach"), &mut output);
        assert!(result.unwrap_err().to_string().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_strategy_reports_missing_wrappers() {
        let file = create_temp_ach(&FILE[1..5].join("\n"));
        let mut output = Vec::new();

        let errors = SyncProcessingStrategy::default()
            .process(file.path(), &mut output)
            .unwrap();
        assert!(errors.contains_file_error(&FileError::FileHeader));
        assert!(errors.contains_file_error(&FileError::FileControl));

        let relaxed = SyncProcessingStrategy::new(Settings {
            opts: ValidateOpts {
                allow_missing_file_header: true,
                allow_missing_file_control: true,
                ..ValidateOpts::default()
            },
            ..Settings::default()
        });
        let errors = relaxed.process(file.path(), &mut Vec::new()).unwrap();
        assert!(errors.is_empty(), "{}", errors);
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
