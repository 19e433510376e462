use crate::core::{DocumentAccessor, ExtractionSession, ItemHandle, LoadResult, StopReason};
use crate::utils::error::Result;
use std::time::Duration;

/// Scrolls the document until the target count is loaded or growth stalls.
pub struct StabilizingLoader<'a, D: DocumentAccessor + ?Sized> {
    document: &'a D,
}

impl<'a, D: DocumentAccessor + ?Sized> StabilizingLoader<'a, D> {
    pub fn new(document: &'a D) -> Self {
        Self { document }
    }

    /// 反覆捲動直到達到目標數量，或連續 `stable_scroll_limit` 次沒有新留言
    pub async fn load(&self, session: &mut ExtractionSession) -> Result<LoadResult> {
        let delay = Duration::from_millis(session.scroll_delay_ms);
        let mut cycles = 0u32;

        session.current_item_count = self.document.current_item_count().await?;
        session.consecutive_stable_scrolls = 0;

        let stop_reason = loop {
            if session.target_reached() {
                break StopReason::TargetReached;
            }

            let last_count = session.current_item_count;

            self.document.scroll_to_bottom().await?;
            tracing::debug!("⬇️ Scrolling down...");
            tokio::time::sleep(delay).await;
            cycles += 1;

            session.current_item_count = self.document.current_item_count().await?;
            tracing::info!(
                "🔄 Found {} comments so far",
                session.current_item_count
            );

            if session.current_item_count == last_count {
                session.consecutive_stable_scrolls += 1;
                tracing::info!(
                    "⏳ No new comments loaded. Attempt {}/{}",
                    session.consecutive_stable_scrolls,
                    session.stable_scroll_limit
                );
            } else {
                session.consecutive_stable_scrolls = 0;
            }

            if session.stalled() {
                tracing::info!(
                    "🛑 Stopping scroll. No new comments loaded after several attempts."
                );
                break StopReason::Stalled;
            }
        };

        let items = self.collect_items(session.current_item_count).await?;
        tracing::info!(
            "✅ Scrolling finished after {} cycles ({:?}), {} comments loaded",
            cycles,
            stop_reason,
            items.len()
        );

        Ok(LoadResult {
            items,
            cycles,
            stop_reason,
        })
    }

    async fn collect_items(&self, count: usize) -> Result<Vec<ItemHandle>> {
        let mut items = Vec::with_capacity(count);
        for index in 0..count {
            // 頁面可能在計數後移除節點，缺的就略過
            if let Some(item) = self.document.item_at(index).await? {
                items.push(item);
            }
        }
        Ok(items)
    }
}
