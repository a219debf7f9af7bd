//! NACHA ACH Engine Library
//! # Overview
//!
//! This library reads, validates, builds and writes NACHA ACH files. Parsing
//! never fails on content: problems are accumulated while the file tree is
//! assembled, and validation reports the first problem of each record or
//! batch.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Code tables, validation options and error types
//! - [`record`] - Fixed-width codecs for every record and addenda type
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Batch and file logic:
//!   - [`core::totals`] - Control totals (counts, entry hash, dollar sums)
//!   - [`core::rules`] - Rules per standard entry class code
//!   - [`core::batch`], [`core::iat_batch`], [`core::adv_batch`] - The batch flavours
//!   - [`core::file`] - File aggregation and the file control
//! - [`io`] - Readers, writer and reports
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Record Types
//!
//! Every record is 94 characters; the first character names its type:
//!
//! - **1** File Header
//! - **5** Batch Header (standard or IAT layout)
//! - **6** Entry Detail (standard, IAT or ADV layout)
//! - **7** Addenda (02, 05, 10 through 18, 98, 99)
//! - **8** Batch Control (standard or ADV layout)
//! - **9** File Control (standard or ADV layout)

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod record;
pub mod strategy;
pub mod types;

pub use core::{AchBatch, AdvBatch, Batch, File, FileBatch, IatBatch};
pub use io::{read_str, Reader, ReadOutcome};
pub use types::{AchError, BatchError, ErrorList, FieldError, FileError, ValidateOpts};
