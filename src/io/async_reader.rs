//! Asynchronous reader with a line-batch interface
//!
//! Drives the same [`Assembler`] as the synchronous reader over any
//! `futures` async buffered source. Lines are pulled in batches so the
//! caller can interleave other work between them.
//!
//! # Architecture
//!
//! ```text
//! tokio::fs::File → compat → futures BufReader → AsyncReader → Assembler
//! ```

use crate::io::reader::{Assembler, ReadOutcome};
use crate::types::{AchError, ValidateOpts};
use futures::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use futures::stream::StreamExt;
use std::path::Path;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// Asynchronous ACH reader
pub struct AsyncReader<R: AsyncBufRead + Unpin> {
    lines: Lines<R>,
    assembler: Assembler,
}

impl<R: AsyncBufRead + Unpin> AsyncReader<R> {
    /// Create a new AsyncReader
    ///
    /// # Arguments
    ///
    /// * `reader` - Async buffered source of ACH lines
    /// * `opts` - Validation overrides
    /// * `validate_batches` - Validate each batch while reading
    pub fn new(reader: R, opts: ValidateOpts, validate_batches: bool) -> Self {
        AsyncReader {
            lines: reader.lines(),
            assembler: Assembler::new(opts, validate_batches),
        }
    }

    /// Feed up to `batch_size` lines to the assembler
    ///
    /// # Returns
    ///
    /// The number of lines consumed; 0 once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an I/O error from the underlying source.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<usize, AchError> {
        let mut read = 0;
        while read < batch_size {
            match self.lines.next().await {
                Some(line) => {
                    self.assembler.push_line(&line?);
                    read += 1;
                }
                None => break,
            }
        }
        Ok(read)
    }

    /// Consume the rest of the source and assemble the file
    pub async fn read_to_end(mut self, batch_size: usize) -> Result<ReadOutcome, AchError> {
        while self.read_batch(batch_size.max(1)).await? > 0 {}
        Ok(self.finish())
    }

    pub fn finish(self) -> ReadOutcome {
        self.assembler.finish()
    }
}

impl AsyncReader<BufReader<Compat<tokio::fs::File>>> {
    /// Open a file on disk through tokio
    pub async fn from_path(
        path: &Path,
        opts: ValidateOpts,
        validate_batches: bool,
    ) -> Result<Self, AchError> {
        let file = tokio::fs::File::open(path).await.map_err(|e| AchError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;
        Ok(AsyncReader::new(
            BufReader::with_capacity(64 * 1024, file.compat()),
            opts,
            validate_batches,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileError;
    use futures::io::Cursor;

    const BATCH: [&str; 4] = [
        "5220Name on Account                     231380104 PPDPAYROLL         230630   1121042880000001",
        "622231380104123456789        0000025000               Receiver Account Name   1121042880000001",
        "705Vacation pay                                                                    00010000001",
        "82200000020023138010000000000000000000025000231380104                          121042880000001",
    ];

    fn source() -> Cursor<Vec<u8>> {
        Cursor::new(BATCH.join("\r\n").into_bytes())
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let mut reader = AsyncReader::new(source(), ValidateOpts::default(), true);
        assert_eq!(reader.read_batch(3).await.unwrap(), 3);
        assert_eq!(reader.read_batch(3).await.unwrap(), 1);
        assert_eq!(reader.read_batch(3).await.unwrap(), 0);

        let outcome = reader.finish();
        assert_eq!(outcome.file.batches.len(), 1);
        assert_eq!(outcome.file.batches[0].as_batch().entry_count(), 1);
        assert!(outcome.errors.contains_file_error(&FileError::FileHeader));
        assert!(outcome.errors.contains_file_error(&FileError::FileControl));
    }

    #[tokio::test]
    async fn test_async_reader_matches_sync() {
        let opts = ValidateOpts {
            allow_missing_file_header: true,
            allow_missing_file_control: true,
            ..ValidateOpts::default()
        };
        let outcome = AsyncReader::new(source(), opts.clone(), true)
            .read_to_end(2)
            .await
            .unwrap();
        let expected = crate::io::reader::read_str(&BATCH.join("\n"), opts);
        assert!(outcome.is_valid(), "{}", outcome.errors);
        assert_eq!(outcome.file, expected.file);
    }

    #[tokio::test]
    async fn test_async_reader_empty_source() {
        let reader = AsyncReader::new(Cursor::new(Vec::new()), ValidateOpts::default(), true);
        let outcome = reader.read_to_end(10).await.unwrap();
        assert!(outcome.file.batches.is_empty());
        assert!(outcome.errors.contains_file_error(&FileError::NoBatches));
    }
}
