use clap::Parser;
use yt_comment_exporter::config::cli::LogFormat;
use yt_comment_exporter::utils::error::ErrorSeverity;
use yt_comment_exporter::utils::{logger, validation::Validate};
use yt_comment_exporter::{
    CliConfig, CommentExporter, DocumentSource, ExportSettings, ExtractionOutcome,
    LocalStorage, NoticeLevel, Result, SnapshotDocument,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting yt-comment-exporter");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    display_config_summary(&settings);
    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the page will not be opened");
        return Ok(());
    }

    println!("⏳ Starting extraction, please wait...");
    println!("   The page is scrolled automatically until enough comments have loaded.");

    match execute(settings).await {
        Ok(outcome) => {
            let code = report_outcome(&outcome);
            if code > 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2, // 可重試
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn load_settings(cli: &CliConfig) -> Result<ExportSettings> {
    if let Some(path) = &cli.config {
        tracing::info!("📁 Loading configuration from: {}", path);
    }
    let file = cli.load_file()?;
    let settings = cli.resolve(file.as_ref())?;
    settings.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    Ok(settings)
}

async fn execute(settings: ExportSettings) -> Result<ExtractionOutcome> {
    let storage = LocalStorage::new(settings.output_path.clone());
    let monitor = settings.monitor;
    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    match settings.source.clone() {
        DocumentSource::Snapshots { paths } => {
            let document = SnapshotDocument::from_files(&paths).await?;
            tracing::info!("📄 Replaying {} snapshot frame(s)", document.frame_count());
            let exporter =
                CommentExporter::new_with_monitoring(document, storage, settings, monitor)?;
            exporter.run().await
        }
        DocumentSource::Live { url } => run_live(&url, storage, settings, monitor).await,
    }
}

#[cfg(feature = "browser")]
async fn run_live(
    url: &str,
    storage: LocalStorage,
    settings: ExportSettings,
    monitor: bool,
) -> Result<ExtractionOutcome> {
    let document = yt_comment_exporter::BrowserDocument::launch(&settings.browser, url).await?;
    let exporter = CommentExporter::new_with_monitoring(document, storage, settings, monitor)?;
    let outcome = exporter.run().await;
    exporter.into_document().close().await?;
    outcome
}

#[cfg(not(feature = "browser"))]
async fn run_live(
    url: &str,
    _storage: LocalStorage,
    _settings: ExportSettings,
    _monitor: bool,
) -> Result<ExtractionOutcome> {
    Err(yt_comment_exporter::ExportError::delivery(format!(
        "cannot open {} because this build has no browser support (rebuild with --features browser)",
        url
    )))
}

/// 顯示結果並回傳退出碼
fn report_outcome(outcome: &ExtractionOutcome) -> i32 {
    match outcome.level() {
        NoticeLevel::Info => {
            println!("✅ {}", outcome.message());
            0
        }
        NoticeLevel::Error => {
            eprintln!("❌ {}", outcome.message());
            1
        }
    }
}

fn display_config_summary(settings: &ExportSettings) {
    println!("📋 Configuration Summary:");
    match &settings.source {
        DocumentSource::Live { url } => println!("  Source: {}", url),
        DocumentSource::Snapshots { paths } => {
            println!("  Source: {} snapshot file(s)", paths.len());
            for path in paths {
                println!("    - {}", path);
            }
        }
    }
    println!("  Target Count: {}", settings.target_count);
    println!("  Scroll Delay: {}ms", settings.scroll_delay_ms);
    println!("  Stable Scroll Limit: {}", settings.stable_scroll_limit);
    println!("  Settle Delay: {}ms", settings.settle_delay_ms);
    println!("  Output: {}", settings.output_path);
    if matches!(settings.source, DocumentSource::Live { .. }) {
        println!("  Headless: {}", settings.browser.headless);
    }
    println!();
}
