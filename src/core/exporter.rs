use crate::core::csv_export;
use crate::core::extractor::CommentExtractor;
use crate::core::loader::StabilizingLoader;
use crate::core::{ConfigProvider, DocumentAccessor, ExtractionOutcome, ExtractionSession, Storage};
use crate::domain::layout::CONTAINER_SELECTOR;
use crate::utils::error::Result;
use crate::utils::monitor::{Phase, SystemMonitor};
use std::time::Duration;

/// Drives one export: reveal, load, truncate, extract, serialize, save.
pub struct CommentExporter<D: DocumentAccessor, S: Storage, C: ConfigProvider> {
    document: D,
    storage: S,
    config: C,
    extractor: CommentExtractor,
    monitor: SystemMonitor,
}

impl<D: DocumentAccessor, S: Storage, C: ConfigProvider> CommentExporter<D, S, C> {
    pub fn new(document: D, storage: S, config: C) -> Result<Self> {
        Self::new_with_monitoring(document, storage, config, false)
    }

    pub fn new_with_monitoring(
        document: D,
        storage: S,
        config: C,
        monitor_enabled: bool,
    ) -> Result<Self> {
        Ok(Self {
            document,
            storage,
            config,
            extractor: CommentExtractor::new()?,
            monitor: SystemMonitor::new(monitor_enabled),
        })
    }

    pub fn into_document(self) -> D {
        self.document
    }

    pub async fn run(&self) -> Result<ExtractionOutcome> {
        let target = self.config.target_count();
        tracing::info!("🚀 Starting extraction, aiming for {} comments", target);
        self.monitor.log_stats(Phase::Start);

        // 先讓留言區進入畫面，才會開始載入
        if !self.document.reveal_container().await? {
            tracing::error!(
                "❌ Could not find the comments section ({}). Aborting.",
                CONTAINER_SELECTOR
            );
            return Ok(ExtractionOutcome::ContainerMissing);
        }
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms())).await;

        let mut session = ExtractionSession::new(
            target,
            self.config.scroll_delay_ms(),
            self.config.stable_scroll_limit(),
        );
        let loaded = StabilizingLoader::new(&self.document)
            .load(&mut session)
            .await?;
        self.monitor.log_stats(Phase::Loading);

        let loaded_count = loaded.items.len();
        let to_process = &loaded.items[..loaded_count.min(target)];
        tracing::info!(
            "🔍 Extracting data from {} of {} loaded comments",
            to_process.len(),
            loaded_count
        );

        let records = self.extractor.extract_all(to_process);
        self.monitor.log_stats(Phase::Extraction);

        let title = if records.is_empty() {
            String::new()
        } else {
            self.document.document_title().await?
        };

        let Some(payload) = csv_export::serialize(&records, &title) else {
            tracing::warn!("⚠️ Could not extract any comments. The page structure might have changed.");
            return Ok(ExtractionOutcome::NoRecords {
                loaded: loaded_count,
            });
        };

        tracing::info!("✅ Successfully extracted {} comments", records.len());
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!("{}", serde_json::to_string_pretty(&records)?);
        }

        self.storage
            .write_file(&payload.file_name, &payload.bytes)
            .await?;
        self.monitor.log_stats(Phase::Export);
        self.monitor.log_final_stats();

        let location = format!("{}/{}", self.config.output_path(), payload.file_name);
        tracing::info!("📁 Comments exported to {}", location);

        Ok(ExtractionOutcome::Exported {
            records: records.len(),
            requested: target,
            loaded: loaded_count,
            file_name: payload.file_name,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ItemHandle;
    use crate::utils::error::ExportError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_count(&self) -> usize {
            self.files.lock().await.len()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        target_count: usize,
        stable_scroll_limit: u32,
    }

    impl ConfigProvider for MockConfig {
        fn target_count(&self) -> usize {
            self.target_count
        }

        fn scroll_delay_ms(&self) -> u64 {
            0
        }

        fn stable_scroll_limit(&self) -> u32 {
            self.stable_scroll_limit
        }

        fn settle_delay_ms(&self) -> u64 {
            0
        }

        fn output_path(&self) -> &str {
            "test_output"
        }
    }

    /// 固定頁面：`items` 全部一次載入，捲動不會增加
    struct StaticPage {
        container: bool,
        items: Vec<String>,
        fetched: Arc<AtomicUsize>,
        fail_title: bool,
    }

    impl StaticPage {
        fn with_items(items: Vec<String>) -> Self {
            Self {
                container: true,
                items,
                fetched: Arc::new(AtomicUsize::new(0)),
                fail_title: false,
            }
        }
    }

    #[async_trait]
    impl DocumentAccessor for StaticPage {
        async fn reveal_container(&self) -> Result<bool> {
            Ok(self.container)
        }

        async fn current_item_count(&self) -> Result<usize> {
            Ok(self.items.len())
        }

        async fn item_at(&self, index: usize) -> Result<Option<ItemHandle>> {
            self.fetched.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .items
                .get(index)
                .map(|html| ItemHandle::new(index, html.clone())))
        }

        async fn scroll_to_bottom(&self) -> Result<()> {
            Ok(())
        }

        async fn document_title(&self) -> Result<String> {
            if self.fail_title {
                return Err(ExportError::document("page closed"));
            }
            Ok("Cool Video - YouTube".to_string())
        }
    }

    fn thread(author: &str, body: &str) -> String {
        format!(
            "<ytd-comment-thread-renderer><a id=\"author-text\">{}</a><span id=\"content-text\">{}</span></ytd-comment-thread-renderer>",
            author, body
        )
    }

    fn config(target_count: usize) -> MockConfig {
        MockConfig {
            target_count,
            stable_scroll_limit: 2,
        }
    }

    #[tokio::test]
    async fn test_missing_container_aborts_without_output() {
        let mut page = StaticPage::with_items(vec![thread("@a", "x")]);
        page.container = false;
        let fetched = Arc::clone(&page.fetched);
        let storage = MockStorage::new();

        let exporter = CommentExporter::new(page, storage.clone(), config(5)).unwrap();
        let outcome = exporter.run().await.unwrap();

        assert_eq!(outcome, ExtractionOutcome::ContainerMissing);
        assert_eq!(fetched.load(Ordering::SeqCst), 0);
        assert_eq!(storage.file_count().await, 0);
    }

    #[tokio::test]
    async fn test_truncates_to_requested_count() {
        let items = (0..8).map(|i| thread(&format!("@user{}", i), "hi")).collect();
        let storage = MockStorage::new();

        let exporter =
            CommentExporter::new(StaticPage::with_items(items), storage.clone(), config(5)).unwrap();
        let outcome = exporter.run().await.unwrap();

        match outcome {
            ExtractionOutcome::Exported {
                records,
                requested,
                loaded,
                ref file_name,
                ref location,
            } => {
                assert_eq!(records, 5);
                assert_eq!(requested, 5);
                assert_eq!(loaded, 8);
                assert_eq!(file_name, "youtube_comments_cool_video___youtube.csv");
                assert_eq!(
                    location,
                    "test_output/youtube_comments_cool_video___youtube.csv"
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let bytes = storage
            .get_file("youtube_comments_cool_video___youtube.csv")
            .await
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("@user4"));
        assert!(!text.contains("@user5"));
    }

    #[tokio::test]
    async fn test_all_items_malformed_reports_no_records() {
        let items = vec![
            "<ytd-comment-thread-renderer><a id=\"author-text\">@a</a></ytd-comment-thread-renderer>".to_string(),
            "<ytd-comment-thread-renderer><a id=\"author-text\">@b</a></ytd-comment-thread-renderer>".to_string(),
        ];
        let storage = MockStorage::new();

        let exporter =
            CommentExporter::new(StaticPage::with_items(items), storage.clone(), config(2)).unwrap();
        let outcome = exporter.run().await.unwrap();

        assert_eq!(outcome, ExtractionOutcome::NoRecords { loaded: 2 });
        assert_eq!(outcome.level(), crate::core::NoticeLevel::Error);
        assert_eq!(storage.file_count().await, 0);
    }

    #[tokio::test]
    async fn test_fewer_items_than_requested_still_exports() {
        let items = (0..3).map(|i| thread(&format!("@u{}", i), "body")).collect();
        let storage = MockStorage::new();

        let exporter =
            CommentExporter::new(StaticPage::with_items(items), storage.clone(), config(5)).unwrap();
        let outcome = exporter.run().await.unwrap();

        assert!(outcome.is_success());
        assert!(matches!(
            outcome,
            ExtractionOutcome::Exported {
                records: 3,
                requested: 5,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_document_failure_propagates() {
        let mut page = StaticPage::with_items(vec![thread("@a", "x")]);
        page.fail_title = true;
        let storage = MockStorage::new();

        let exporter = CommentExporter::new(page, storage.clone(), config(1)).unwrap();
        let err = exporter.run().await.unwrap_err();

        assert!(matches!(err, ExportError::DocumentError { .. }));
        assert_eq!(storage.file_count().await, 0);
    }
}
