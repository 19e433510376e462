pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

#[cfg(feature = "browser")]
pub use adapters::browser::BrowserDocument;

pub use adapters::{snapshot::SnapshotDocument, storage::LocalStorage};
pub use config::{DocumentSource, ExportSettings};
pub use core::{exporter::CommentExporter, CommentRecord, ExtractionOutcome, NoticeLevel};
pub use utils::error::{ExportError, Result};
