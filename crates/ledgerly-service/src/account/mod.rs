//! Account deletion and export.

pub mod service;

pub use service::{AccountService, DeletionPreview};
