use serde::{Deserialize, Serialize};

pub const PUBLISHED_TIME_FALLBACK: &str = "N/A";
pub const LIKES_FALLBACK: &str = "0";

/// 單一留言的結構化資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub username: String,
    pub comment: String,
    pub published_time: String,
    pub likes: String,
}

impl CommentRecord {
    /// Column names in declaration order; this is the CSV header.
    pub const FIELDS: [&'static str; 4] = ["username", "comment", "published_time", "likes"];

    pub fn new(
        username: impl Into<String>,
        comment: impl Into<String>,
        published_time: impl Into<String>,
        likes: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            comment: comment.into(),
            published_time: published_time.into(),
            likes: likes.into(),
        }
    }

    /// Cell values in the same order as [`CommentRecord::FIELDS`].
    pub fn values(&self) -> [&str; 4] {
        [
            &self.username,
            &self.comment,
            &self.published_time,
            &self.likes,
        ]
    }
}

/// A rendered content item, captured as its outer HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemHandle {
    pub index: usize,
    pub html: String,
}

impl ItemHandle {
    pub fn new(index: usize, html: impl Into<String>) -> Self {
        Self {
            index,
            html: html.into(),
        }
    }
}

/// 載入迴圈的暫存狀態，只由 loader 修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSession {
    pub target_count: usize,
    pub scroll_delay_ms: u64,
    pub stable_scroll_limit: u32,
    pub current_item_count: usize,
    pub consecutive_stable_scrolls: u32,
}

impl ExtractionSession {
    pub fn new(target_count: usize, scroll_delay_ms: u64, stable_scroll_limit: u32) -> Self {
        Self {
            target_count,
            scroll_delay_ms,
            stable_scroll_limit,
            current_item_count: 0,
            consecutive_stable_scrolls: 0,
        }
    }

    pub fn target_reached(&self) -> bool {
        self.current_item_count >= self.target_count
    }

    pub fn stalled(&self) -> bool {
        self.consecutive_stable_scrolls >= self.stable_scroll_limit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    Stalled,
}

#[derive(Debug, Clone)]
pub struct LoadResult {
    pub items: Vec<ItemHandle>,
    pub cycles: u32,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// 每次執行的最終結果，由呼叫端決定如何呈現
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    ContainerMissing,
    NoRecords {
        loaded: usize,
    },
    Exported {
        records: usize,
        requested: usize,
        loaded: usize,
        file_name: String,
        location: String,
    },
}

impl ExtractionOutcome {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::Exported { .. } => NoticeLevel::Info,
            Self::ContainerMissing | Self::NoRecords { .. } => NoticeLevel::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Exported { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::ContainerMissing => {
                "Could not find the comments section. Aborting.".to_string()
            }
            Self::NoRecords { .. } => {
                "Could not extract any comments. The page structure might have changed."
                    .to_string()
            }
            Self::Exported {
                records,
                requested,
                location,
                ..
            } if records < requested => format!(
                "Extraction complete! {} of {} requested comments have been saved to {}",
                records, requested, location
            ),
            Self::Exported {
                records, location, ..
            } => format!(
                "Extraction complete! {} comments have been saved to {}",
                records, location
            ),
        }
    }
}
