//! Structural selectors for the YouTube watch-page comment section.

/// The comments region that must be revealed before items start loading.
pub const CONTAINER_SELECTOR: &str = "#comments";

/// One rendered comment thread.
pub const ITEM_SELECTOR: &str = "ytd-comment-thread-renderer";

pub const AUTHOR_SELECTOR: &str = "#author-text";
pub const CONTENT_SELECTOR: &str = "#content-text";
pub const PUBLISHED_TIME_SELECTOR: &str = "yt-formatted-string.published-time-text a";
pub const LIKES_SELECTOR: &str = "#vote-count-middle";
