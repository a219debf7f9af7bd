//! Asynchronous batch processing strategy
//!
//! Reads the file through [`AsyncReader`] with batch validation deferred,
//! then validates every batch as its own task on a tokio multi-threaded
//! runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (line batches → Assembler, validation deferred)
//!     ├── validation tasks (at most max_concurrent_batches in flight)
//!     │       └── DashMap<index, (batch, result)>
//!     └── File Control check (after every task is joined)
//! ```
//!
//! Batches share no state, so validating them concurrently yields the same
//! errors as the synchronous strategy. Batch errors are reported in batch
//! order after the structural errors met while reading.

use crate::core::file::FileBatch;
use crate::io::async_reader::AsyncReader;
use crate::io::write_output;
use crate::strategy::{log_outcome, ProcessingStrategy, Settings};
use crate::types::{AchError, BatchError, ErrorList, ValidateOpts};
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of lines fed to the assembler per read
    pub batch_size: usize,
    /// Maximum number of batches validating concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a logged warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            log::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            log::warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches,
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

type BatchOutcome = (FileBatch, Result<(), BatchError>);

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    settings: Settings,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `settings` - Validation overrides and output format
    /// * `config` - BatchConfig with batch_size and max_concurrent_batches
    pub fn new(settings: Settings, config: BatchConfig) -> Self {
        Self { settings, config }
    }

    /// Validate every batch concurrently, returning them in their original order
    async fn validate_batches(
        &self,
        batches: Vec<FileBatch>,
        opts: Arc<ValidateOpts>,
    ) -> Result<(Vec<FileBatch>, Vec<BatchError>), AchError> {
        let count = batches.len();
        let results: Arc<DashMap<usize, BatchOutcome>> = Arc::new(DashMap::new());

        let joined: Vec<_> = stream::iter(batches.into_iter().enumerate())
            .map(|(index, batch)| {
                let opts = Arc::clone(&opts);
                let results = Arc::clone(&results);
                tokio::spawn(async move {
                    let result = batch.as_batch().validate_with(&opts);
                    log::debug!("Validated batch {}", batch.as_batch().batch_number());
                    results.insert(index, (batch, result));
                })
            })
            .buffer_unordered(self.config.max_concurrent_batches.max(1))
            .collect()
            .await;

        for join in joined {
            join.map_err(|e| AchError::Io {
                message: format!("Batch validation task failed: {}", e),
            })?;
        }

        let mut ordered = Vec::with_capacity(count);
        let mut errors = Vec::new();
        for index in 0..count {
            let Some((_, (batch, result))) = results.remove(&index) else {
                return Err(AchError::Io {
                    message: format!("Batch {} was not validated", index + 1),
                });
            };
            if let Err(e) = result {
                errors.push(e);
            }
            ordered.push(batch);
        }
        Ok((ordered, errors))
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<ErrorList, AchError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches.max(1))
            .build()
            .map_err(|e| AchError::Io {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let opts = Arc::new(self.settings.opts.clone());
        let mut outcome = runtime.block_on(async {
            log::debug!("Reading {} asynchronously", input_path.display());
            let reader = AsyncReader::from_path(input_path, (*opts).clone(), false).await?;
            let mut outcome = reader.read_to_end(self.config.batch_size).await?;

            if !opts.skip_all {
                let batches = std::mem::take(&mut outcome.file.batches);
                let (batches, errors) = self.validate_batches(batches, Arc::clone(&opts)).await?;
                outcome.file.batches = batches;
                outcome.errors.extend(errors.into_iter().map(AchError::from));
            }
            Ok::<_, AchError>(outcome)
        })?;

        outcome.check_file_control(&opts);
        log_outcome(
            &outcome.errors,
            outcome.file.batches.len(),
            outcome.file.entry_count(),
        );
        write_output(&outcome.file, self.settings.format, output)?;
        Ok(outcome.errors)
    }
}
