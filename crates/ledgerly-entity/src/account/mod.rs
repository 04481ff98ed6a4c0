//! Account deletion and export types.

pub mod export;

pub use export::{DeletionReceipt, ProfileExport};
