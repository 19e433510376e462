use crate::domain::model::ItemHandle;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn target_count(&self) -> usize;
    fn scroll_delay_ms(&self) -> u64;
    fn stable_scroll_limit(&self) -> u32;
    fn settle_delay_ms(&self) -> u64;
    fn output_path(&self) -> &str;
}

/// Capability interface over the rendered page.
///
/// The loader is the only caller of `scroll_to_bottom`; everything else is a read.
#[async_trait]
pub trait DocumentAccessor: Send + Sync {
    /// Bring the comments container into view. Returns `false` when it is not on the page.
    async fn reveal_container(&self) -> Result<bool>;
    async fn current_item_count(&self) -> Result<usize>;
    async fn item_at(&self, index: usize) -> Result<Option<ItemHandle>>;
    async fn scroll_to_bottom(&self) -> Result<()>;
    async fn document_title(&self) -> Result<String>;
}
