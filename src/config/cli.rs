use crate::config::toml_config::TomlConfig;
use crate::config::{
    BrowserSettings, ExportSettings, DEFAULT_OUTPUT_PATH, DEFAULT_SCROLL_DELAY_MS,
    DEFAULT_SETTLE_DELAY_MS, DEFAULT_STABLE_SCROLL_LIMIT,
};
use crate::utils::error::Result;
use crate::utils::validation;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "yt-comment-exporter")]
#[command(about = "Scroll a YouTube video page, collect its comments and export them to CSV")]
pub struct CliConfig {
    /// Number of comments to export
    #[arg(short = 'n', long = "count")]
    pub target_count: Option<usize>,

    /// YouTube watch page to open in a browser
    #[arg(long)]
    pub url: Option<String>,

    /// Saved HTML capture of a watch page; repeat to replay successive scroll states
    #[arg(long = "snapshot")]
    pub snapshots: Vec<String>,

    /// TOML configuration file; command line flags take precedence
    #[arg(short, long)]
    pub config: Option<String>,

    /// Wait after each scroll for new comments to load
    #[arg(long)]
    pub scroll_delay_ms: Option<u64>,

    /// Stop after this many scrolls in a row load nothing new
    #[arg(long)]
    pub stable_scroll_limit: Option<u32>,

    /// Wait after bringing the comments section into view
    #[arg(long)]
    pub settle_delay_ms: Option<u64>,

    /// Directory the CSV file is written to
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// Browser executable to launch instead of the detected one
    #[arg(long)]
    pub executable: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    /// Print the resolved configuration without opening the page
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn load_file(&self) -> Result<Option<TomlConfig>> {
        self.config.as_ref().map(TomlConfig::from_file).transpose()
    }

    /// 命令列優先，其次為設定檔，最後是預設值
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Result<ExportSettings> {
        let file_default = TomlConfig::default();
        let file = file.unwrap_or(&file_default);

        let target_count = validation::validate_required_field(
            "count",
            self.target_count.or(file.target_count()),
        )?;

        let (url, snapshots) = if self.url.is_some() || !self.snapshots.is_empty() {
            (self.url.clone(), self.snapshots.clone())
        } else {
            (file.url().map(str::to_string), file.snapshots().to_vec())
        };
        let source = ExportSettings::select_source(url, snapshots)?;

        Ok(ExportSettings {
            target_count,
            scroll_delay_ms: self
                .scroll_delay_ms
                .or(file.scroll_delay_ms())
                .unwrap_or(DEFAULT_SCROLL_DELAY_MS),
            stable_scroll_limit: self
                .stable_scroll_limit
                .or(file.stable_scroll_limit())
                .unwrap_or(DEFAULT_STABLE_SCROLL_LIMIT),
            settle_delay_ms: self
                .settle_delay_ms
                .or(file.settle_delay_ms())
                .unwrap_or(DEFAULT_SETTLE_DELAY_MS),
            output_path: self
                .output_path
                .clone()
                .or(file.output_path().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string()),
            source,
            browser: BrowserSettings {
                headless: !self.headful && file.headless().unwrap_or(true),
                executable: self
                    .executable
                    .clone()
                    .or(file.executable().map(str::to_string)),
            },
            monitor: self.monitor || file.monitoring_enabled(),
        })
    }
}
