//! Live watch page driven through the Chrome DevTools Protocol.

use crate::config::BrowserSettings;
use crate::core::{DocumentAccessor, ItemHandle};
use crate::domain::layout::{CONTAINER_SELECTOR, ITEM_SELECTOR};
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Handler, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

pub struct BrowserDocument {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl BrowserDocument {
    /// 啟動瀏覽器並開啟影片頁面
    pub async fn launch(settings: &BrowserSettings, url: &str) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &settings.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder
            .build()
            .map_err(|e| ExportError::delivery(format!("invalid browser configuration: {}", e)))?;

        tracing::info!("🌐 Launching browser (headless: {})", settings.headless);
        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|e| ExportError::delivery(format!("browser launch failed: {}", e)))?;
        let handler_task = spawn_handler_task(handler);

        let page = match browser.new_page(url).await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(ExportError::delivery(format!("cannot open {}: {}", url, e)));
            }
        };
        if let Err(e) = page.wait_for_navigation().await {
            handler_task.abort();
            return Err(ExportError::delivery(format!("navigation to {} failed: {}", url, e)));
        }
        tracing::info!("📺 Opened {}", url);

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Browser did not close cleanly: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ExportError::document(format!("script evaluation failed: {}", e)))?;
        result
            .into_value::<T>()
            .map_err(|e| ExportError::document(format!("unexpected script result: {}", e)))
    }
}

fn spawn_handler_task(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::warn!("chromiumoxide handler event error: {}", e);
            }
        }
    })
}

#[async_trait]
impl DocumentAccessor for BrowserDocument {
    async fn reveal_container(&self) -> Result<bool> {
        self.eval(format!(
            r#"(() => {{
                const el = document.querySelector('{}');
                if (!el) return false;
                el.scrollIntoView({{ behavior: 'smooth' }});
                return true;
            }})()"#,
            CONTAINER_SELECTOR
        ))
        .await
    }

    async fn current_item_count(&self) -> Result<usize> {
        self.eval(format!(
            "document.querySelectorAll('{}').length",
            ITEM_SELECTOR
        ))
        .await
    }

    async fn item_at(&self, index: usize) -> Result<Option<ItemHandle>> {
        // null 反序列化不穩定，以空字串代表不存在
        let html: String = self
            .eval(format!(
                r#"(() => {{
                    const el = document.querySelectorAll('{}')[{}];
                    return el ? el.outerHTML : '';
                }})()"#,
                ITEM_SELECTOR, index
            ))
            .await?;
        Ok((!html.is_empty()).then(|| ItemHandle::new(index, html)))
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.eval::<bool>(
            "(() => { window.scrollTo(0, document.documentElement.scrollHeight); return true; })()"
                .to_string(),
        )
        .await?;
        Ok(())
    }

    async fn document_title(&self) -> Result<String> {
        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| ExportError::document(format!("cannot read title: {}", e)))?;
        Ok(title.unwrap_or_default())
    }
}
