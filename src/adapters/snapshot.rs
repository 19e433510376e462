//! Replays saved HTML captures of a watch page as a [`DocumentAccessor`].
//!
//! Frame 0 is the initial render; every scroll advances to the next capture and
//! stays on the last one, so a series of captures taken while scrolling replays
//! lazy loading and a single capture stalls immediately.

use crate::core::{DocumentAccessor, ItemHandle};
use crate::domain::layout::{CONTAINER_SELECTOR, ITEM_SELECTOR};
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct SnapshotFrame {
    title: String,
    has_container: bool,
    items: Vec<String>,
}

#[derive(Debug)]
pub struct SnapshotDocument {
    frames: Vec<SnapshotFrame>,
    cursor: AtomicUsize,
}

impl SnapshotDocument {
    pub fn from_html(pages: Vec<String>) -> Result<Self> {
        if pages.is_empty() {
            return Err(ExportError::delivery("no snapshot pages were provided"));
        }

        let container = compile(CONTAINER_SELECTOR)?;
        let item = compile(ITEM_SELECTOR)?;
        let title = compile("title")?;

        let frames = pages
            .iter()
            .map(|page| parse_frame(page, &container, &item, &title))
            .collect();

        Ok(Self {
            frames,
            cursor: AtomicUsize::new(0),
        })
    }

    pub async fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut pages = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let page = tokio::fs::read_to_string(path).await.map_err(|e| {
                ExportError::delivery(format!("cannot read snapshot {}: {}", path.display(), e))
            })?;
            tracing::debug!("📄 Loaded snapshot {} ({} bytes)", path.display(), page.len());
            pages.push(page);
        }
        Self::from_html(pages)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn current(&self) -> &SnapshotFrame {
        &self.frames[self.cursor.load(Ordering::SeqCst)]
    }
}

// Html 不是 Send，解析完只保留字串
fn parse_frame(page: &str, container: &Selector, item: &Selector, title: &Selector) -> SnapshotFrame {
    let document = Html::parse_document(page);

    SnapshotFrame {
        title: document
            .select(title)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default(),
        has_container: document.select(container).next().is_some(),
        items: document.select(item).map(|el| el.html()).collect(),
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExportError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl DocumentAccessor for SnapshotDocument {
    async fn reveal_container(&self) -> Result<bool> {
        Ok(self.current().has_container)
    }

    async fn current_item_count(&self) -> Result<usize> {
        Ok(self.current().items.len())
    }

    async fn item_at(&self, index: usize) -> Result<Option<ItemHandle>> {
        Ok(self
            .current()
            .items
            .get(index)
            .map(|html| ItemHandle::new(index, html.clone())))
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        let last = self.frames.len() - 1;
        let _ = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cursor| {
                (cursor < last).then_some(cursor + 1)
            });
        Ok(())
    }

    async fn document_title(&self) -> Result<String> {
        Ok(self.current().title.clone())
    }
}
