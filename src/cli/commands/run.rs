use crate::core::{ProcessingConfig, RunnerMode};
use crate::engine::ProcessingEngine;
use crate::image_loader::standard::StandardImageLoader;
use crate::services::{
    ConsoleProgressReporter, DefaultProcessingConfig, DelayedTransform, DirectoryImageSink,
    DirectoryImageSource, OutputFormat, UpscaleContrastTransform,
};
use crate::storage::local::LocalStorageBackend;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLIから構築するエンジンの具象型
pub type CliEngine = ProcessingEngine<
    DirectoryImageSource<LocalStorageBackend, StandardImageLoader>,
    DirectoryImageSink,
    DelayedTransform<UpscaleContrastTransform>,
    DefaultProcessingConfig,
    ConsoleProgressReporter,
>;

/// エンジン構築に必要な設定
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub mode: RunnerMode,
    pub workers: Option<usize>,
    pub format: OutputFormat,
    pub delay: Duration,
    pub quiet: bool,
}

/// Configuration struct for run command to reduce argument count
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub report: Option<PathBuf>,
    pub engine: EngineSettings,
}

/// 設定からエンジンを構築
pub fn build_engine(settings: &EngineSettings) -> Result<CliEngine> {
    let mut config = DefaultProcessingConfig::default()
        .with_runner_mode(settings.mode)
        .with_progress_reporting(!settings.quiet);
    if let Some(workers) = settings.workers {
        config = config.with_max_concurrent(workers);
    }
    config.validate()?;

    let reporter = if config.enable_progress_reporting() {
        ConsoleProgressReporter::new()
    } else {
        ConsoleProgressReporter::quiet()
    };

    Ok(ProcessingEngine::new(
        DirectoryImageSource::new(LocalStorageBackend::new(), StandardImageLoader::new()),
        DirectoryImageSink::new(settings.format),
        DelayedTransform::new(UpscaleContrastTransform::new(), settings.delay),
        config,
        reporter,
    ))
}

/// 入力ディレクトリの検証
pub fn validate_input_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Input directory does not exist: {}", path.display());
    }

    if !path.is_dir() {
        anyhow::bail!("Input path is not a directory: {}", path.display());
    }

    Ok(())
}

/// Ctrl-Cでエンジンのトークンをキャンセルするタスクを起動
pub fn spawn_interrupt_handler(engine: &CliEngine) -> tokio::task::JoinHandle<()> {
    let cancel = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling batch");
            cancel.cancel();
        }
    })
}

/// Execute run command
pub async fn execute_run(config: RunConfig) -> Result<()> {
    validate_input_directory(&config.input_directory)?;

    let engine = build_engine(&config.engine)?;
    let quiet = config.engine.quiet;

    if !quiet {
        println!("🖼️  画像バッチ変換");
        println!("   - 入力ディレクトリ: {}", config.input_directory.display());
        println!("   - 出力ディレクトリ: {}", config.output_directory.display());
        println!("⚙️  処理設定:");
        println!("   - 実行方式: {}", engine.config().runner_mode().as_str());
        println!("   - 並行処理数: {}", engine.config().max_concurrent_tasks());
        println!("   - バッファサイズ: {}", engine.config().channel_buffer_size());
        if !config.engine.delay.is_zero() {
            println!("   - 遅延: {}ms/画像", config.engine.delay.as_millis());
        }
    }

    let interrupt = spawn_interrupt_handler(&engine);
    let result = engine
        .process_directory(&config.input_directory, &config.output_directory)
        .await;
    interrupt.abort();

    let summary = result.context("Batch processing failed")?;

    if !quiet {
        println!("\n✅ 処理完了!");
        println!("📊 処理結果:");
        println!("   - 対象画像数: {}", summary.total_images);
        println!("   - 出力ファイル数: {}", summary.written_files);
        println!("   - 読み込み時間: {:.2}秒", summary.load_time.as_secs_f64());
        println!("   - 変換時間: {:.2}秒", summary.processing_time.as_secs_f64());
        println!("   - 書き出し時間: {:.2}秒", summary.save_time.as_secs_f64());
        println!(
            "   - 平均変換時間: {:.2}ms/画像",
            summary.average_time_per_image_ms()
        );
    }

    if let Some(report_path) = &config.report {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(report_path, json)
            .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
        if !quiet {
            println!("📄 レポートを {} に保存しました", report_path.display());
        }
    }

    Ok(())
}
