use crate::config::{
    BrowserSettings, ExportSettings, DEFAULT_OUTPUT_PATH, DEFAULT_SCROLL_DELAY_MS,
    DEFAULT_SETTLE_DELAY_MS, DEFAULT_STABLE_SCROLL_LIMIT,
};
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: Option<SourceConfig>,
    pub loader: Option<LoaderConfig>,
    pub output: Option<OutputConfig>,
    pub browser: Option<BrowserConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: Option<String>,
    pub snapshots: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub target_count: Option<usize>,
    pub scroll_delay_ms: Option<u64>,
    pub stable_scroll_limit: Option<u32>,
    pub settle_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: Option<bool>,
    pub executable: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ExportError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VIDEO_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExportError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn url(&self) -> Option<&str> {
        self.source.as_ref()?.url.as_deref()
    }

    pub fn snapshots(&self) -> &[String] {
        self.source
            .as_ref()
            .and_then(|s| s.snapshots.as_deref())
            .unwrap_or(&[])
    }

    pub fn target_count(&self) -> Option<usize> {
        self.loader.as_ref()?.target_count
    }

    pub fn scroll_delay_ms(&self) -> Option<u64> {
        self.loader.as_ref()?.scroll_delay_ms
    }

    pub fn stable_scroll_limit(&self) -> Option<u32> {
        self.loader.as_ref()?.stable_scroll_limit
    }

    pub fn settle_delay_ms(&self) -> Option<u64> {
        self.loader.as_ref()?.settle_delay_ms
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref()?.path.as_deref()
    }

    pub fn headless(&self) -> Option<bool> {
        self.browser.as_ref()?.headless
    }

    pub fn executable(&self) -> Option<&str> {
        self.browser.as_ref()?.executable.as_deref()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// 只用設定檔時的最終設定，未填的欄位使用預設值
    pub fn to_settings(&self) -> Result<ExportSettings> {
        let target_count =
            validation::validate_required_field("loader.target_count", self.target_count())?;
        let source = ExportSettings::select_source(
            self.url().map(str::to_string),
            self.snapshots().to_vec(),
        )?;

        Ok(ExportSettings {
            target_count,
            scroll_delay_ms: self.scroll_delay_ms().unwrap_or(DEFAULT_SCROLL_DELAY_MS),
            stable_scroll_limit: self
                .stable_scroll_limit()
                .unwrap_or(DEFAULT_STABLE_SCROLL_LIMIT),
            settle_delay_ms: self.settle_delay_ms().unwrap_or(DEFAULT_SETTLE_DELAY_MS),
            output_path: self
                .output_path()
                .unwrap_or(DEFAULT_OUTPUT_PATH)
                .to_string(),
            source,
            browser: BrowserSettings {
                headless: self.headless().unwrap_or(true),
                executable: self.executable().map(str::to_string),
            },
            monitor: self.monitoring_enabled(),
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings()?.validate()
    }
}
