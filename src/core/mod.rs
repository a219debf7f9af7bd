//! Core batch and file logic
//!
//! This module contains the components layered on top of the record codecs:
//! - `traits` - Trait abstractions shared by the batch flavours
//! - `totals` - Control-total engine (counts, entry hash, dollar totals)
//! - `rules` - SEC code rule tables
//! - `batch` - Standard batches
//! - `iat_batch` - International ACH Transaction batches
//! - `adv_batch` - Automated accounting advice batches
//! - `file` - File aggregation and file control

pub mod adv_batch;
pub mod batch;
pub mod file;
pub mod iat_batch;
pub mod rules;
pub mod totals;
pub mod traits;

pub use adv_batch::AdvBatch;
pub use batch::Batch;
pub use file::{File, FileBatch};
pub use iat_batch::IatBatch;
pub use rules::SecRules;
pub use totals::ControlTotals;
pub use traits::{AchBatch, ControlEntry};
