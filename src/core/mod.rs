pub mod csv_export;
pub mod exporter;
pub mod extractor;
pub mod loader;

pub use crate::domain::model::{
    CommentRecord, CsvPayload, ExtractionOutcome, ExtractionSession, ItemHandle, LoadResult,
    NoticeLevel, StopReason,
};
pub use crate::domain::ports::{ConfigProvider, DocumentAccessor, Storage};
pub use crate::utils::error::Result;
