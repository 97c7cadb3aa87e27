use super::run::{build_engine, validate_input_directory, EngineSettings};
use crate::core::RunnerComparison;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Configuration struct for compare command
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub input_directory: PathBuf,
    pub engine: EngineSettings,
}

/// Execute compare command
///
/// 同じバッチを逐次・並列の両方式で処理し、出力の一致と所要時間を表示する
pub async fn execute_compare(config: CompareConfig) -> Result<RunnerComparison> {
    validate_input_directory(&config.input_directory)?;

    let engine = build_engine(&config.engine)?;

    println!("🔬 実行方式の比較");
    println!("   - 入力ディレクトリ: {}", config.input_directory.display());

    let comparison = engine
        .compare_directory(&config.input_directory)
        .await
        .context("Runner comparison failed")?;

    println!("\n📊 比較結果:");
    println!("   - 対象画像数: {}", comparison.total_images);
    println!(
        "   - 逐次実行: {:.2}秒",
        comparison.sequential_time.as_secs_f64()
    );
    println!(
        "   - 並列実行: {:.2}秒",
        comparison.concurrent_time.as_secs_f64()
    );
    println!("   - 速度向上: {:.2}x", comparison.speedup());

    if comparison.outputs_identical {
        println!("✅ 出力は完全に一致しました");
    } else {
        anyhow::bail!("Sequential and concurrent outputs differ");
    }

    Ok(comparison)
}
