#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SCROLL_DELAY_MS: u64 = 2000;
pub const DEFAULT_STABLE_SCROLL_LIMIT: u32 = 5;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2000;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Upper bound for either delay; anything longer is almost certainly a typo.
const MAX_DELAY_MS: u64 = 600_000;

/// 要擷取的頁面來源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentSource {
    Live { url: String },
    Snapshots { paths: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSettings {
    pub headless: bool,
    pub executable: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
        }
    }
}

/// 合併命令列與 TOML 後的最終設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub target_count: usize,
    pub scroll_delay_ms: u64,
    pub stable_scroll_limit: u32,
    pub settle_delay_ms: u64,
    pub output_path: String,
    pub source: DocumentSource,
    pub browser: BrowserSettings,
    pub monitor: bool,
}

impl ExportSettings {
    pub fn new(target_count: usize, source: DocumentSource) -> Self {
        Self {
            target_count,
            scroll_delay_ms: DEFAULT_SCROLL_DELAY_MS,
            stable_scroll_limit: DEFAULT_STABLE_SCROLL_LIMIT,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            source,
            browser: BrowserSettings::default(),
            monitor: false,
        }
    }

    /// Pick the single document source out of an optional URL and snapshot list.
    pub fn select_source(url: Option<String>, snapshots: Vec<String>) -> Result<DocumentSource> {
        match (url, snapshots.is_empty()) {
            (Some(url), true) => Ok(DocumentSource::Live { url }),
            (None, false) => Ok(DocumentSource::Snapshots { paths: snapshots }),
            (Some(_), false) => Err(ExportError::ConfigValidationError {
                field: "source".to_string(),
                message: "use either a URL or snapshot files, not both".to_string(),
            }),
            (None, true) => Err(ExportError::MissingConfigError {
                field: "source.url or source.snapshots".to_string(),
            }),
        }
    }
}

impl ConfigProvider for ExportSettings {
    fn target_count(&self) -> usize {
        self.target_count
    }

    fn scroll_delay_ms(&self) -> u64 {
        self.scroll_delay_ms
    }

    fn stable_scroll_limit(&self) -> u32 {
        self.stable_scroll_limit
    }

    fn settle_delay_ms(&self) -> u64 {
        self.settle_delay_ms
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for ExportSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("target_count", self.target_count, 1)?;
        validation::validate_positive_number(
            "stable_scroll_limit",
            self.stable_scroll_limit as usize,
            1,
        )?;
        validation::validate_range("scroll_delay_ms", self.scroll_delay_ms, 0, MAX_DELAY_MS)?;
        validation::validate_range("settle_delay_ms", self.settle_delay_ms, 0, MAX_DELAY_MS)?;
        validation::validate_path("output_path", &self.output_path)?;

        match &self.source {
            DocumentSource::Live { url } => validation::validate_watch_url("url", url)?,
            DocumentSource::Snapshots { paths } => {
                for path in paths {
                    validation::validate_path("snapshot", path)?;
                }
                validation::validate_file_extensions("snapshot", paths, &["html", "htm"])?;
            }
        }

        if let Some(executable) = &self.browser.executable {
            validation::validate_path("browser.executable", executable)?;
        }

        Ok(())
    }
}
