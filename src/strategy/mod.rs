//! Processing strategy module
//!
//! A strategy is a complete pipeline: read an ACH file, assemble and validate
//! it, then write the requested output. The synchronous and asynchronous
//! implementations are selected at runtime and produce the same file tree
//! and the same set of errors.

use crate::cli::{OutputFormat, StrategyType};
use crate::types::{AchError, ErrorList, ValidateOpts};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// What every strategy needs besides its own tuning
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub opts: ValidateOpts,
    pub format: OutputFormat,
}

/// Processing strategy trait for complete ACH pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Process the input file and write the result to output
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input ACH file
    /// * `output` - Writer receiving the report or re-serialized file
    ///
    /// # Returns
    ///
    /// The accumulated parse and validation errors. Output is written even
    /// when errors were found.
    ///
    /// # Errors
    ///
    /// Returns an error only when the input cannot be read or the output
    /// cannot be written.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<ErrorList, AchError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `settings` - Validation overrides and output format
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    settings: Settings,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(settings)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(settings, config))
        }
    }
}

/// Log every accumulated error and a one-line summary
pub(crate) fn log_outcome(errors: &ErrorList, batches: usize, entries: usize) {
    for error in errors.iter() {
        log::warn!("{}", error);
    }
    log::info!(
        "Read {} batches with {} entries, {} errors",
        batches,
        entries,
        errors.len()
    );
}
