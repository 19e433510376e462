use crate::core::{CommentRecord, ItemHandle};
use crate::domain::layout::{
    AUTHOR_SELECTOR, CONTENT_SELECTOR, LIKES_SELECTOR, PUBLISHED_TIME_SELECTOR,
};
use crate::domain::model::{LIKES_FALLBACK, PUBLISHED_TIME_FALLBACK};
use crate::utils::error::{ExportError, Result};
use scraper::{ElementRef, Html, Selector};

/// Turns a rendered comment thread into a [`CommentRecord`].
pub struct CommentExtractor {
    author: Selector,
    content: Selector,
    published_time: Selector,
    likes: Selector,
}

impl CommentExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            author: compile(AUTHOR_SELECTOR)?,
            content: compile(CONTENT_SELECTOR)?,
            published_time: compile(PUBLISHED_TIME_SELECTOR)?,
            likes: compile(LIKES_SELECTOR)?,
        })
    }

    /// 作者與內容為必要欄位，缺一即略過此留言
    pub fn extract(&self, item: &ItemHandle) -> Option<CommentRecord> {
        let fragment = Html::parse_fragment(&item.html);

        let username = first_text(&fragment, &self.author);
        let comment = first_text(&fragment, &self.content);

        let (Some(username), Some(comment)) = (username, comment) else {
            tracing::debug!("Skipping comment #{}: author or body missing", item.index);
            return None;
        };

        let published_time = first_text(&fragment, &self.published_time)
            .unwrap_or_else(|| PUBLISHED_TIME_FALLBACK.to_string());

        // 只有一個讚時圖示不顯示數字，視為 0
        let likes = first_text(&fragment, &self.likes)
            .filter(|likes| !likes.is_empty())
            .unwrap_or_else(|| LIKES_FALLBACK.to_string());

        Some(CommentRecord {
            username,
            comment,
            published_time,
            likes,
        })
    }

    pub fn extract_all<'a, I>(&self, items: I) -> Vec<CommentRecord>
    where
        I: IntoIterator<Item = &'a ItemHandle>,
    {
        items
            .into_iter()
            .filter_map(|item| self.extract(item))
            .collect()
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExportError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn first_text(fragment: &Html, selector: &Selector) -> Option<String> {
    fragment.select(selector).next().map(text_content)
}

fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
