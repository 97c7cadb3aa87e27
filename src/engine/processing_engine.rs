// ProcessingEngine - 依存性注入によるディレクトリ単位のバッチ処理エンジン
// 読み込み、変換、書き出しを束ね、実行方式を設定で切り替える

use super::{api::compare_runners, ConcurrentBatchRunner, SequentialBatchRunner};
use crate::{
    core::{
        BatchRunner, ImageSink, ImageSource, ImageTransform, LoadedBatch, PipelineSummary,
        ProcessingConfig, ProcessingResult, ProgressReporter, RunnerComparison, RunnerMode,
    },
    services::config::implementations::validate_config,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// ディレクトリ処理エンジン
///
/// 全ての依存関係をコンストラクタで注入する。
/// ワーカー間で共有される変換・設定・レポーターはArcで保持する。
pub struct ProcessingEngine<Src, Snk, T, C, R> {
    source: Src,
    sink: Snk,
    transform: Arc<T>,
    config: Arc<C>,
    reporter: Arc<R>,
    cancel: CancellationToken,
}

impl<Src, Snk, T, C, R> ProcessingEngine<Src, Snk, T, C, R>
where
    Src: ImageSource,
    Snk: ImageSink,
    T: ImageTransform + 'static,
    C: ProcessingConfig + 'static,
    R: ProgressReporter + 'static,
{
    pub fn new(source: Src, sink: Snk, transform: T, config: C, reporter: R) -> Self {
        Self {
            source,
            sink,
            transform: Arc::new(transform),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            cancel: CancellationToken::new(),
        }
    }

    /// 実行中の処理を外部から中断するためのトークン
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 逐次実行方式を作成
    pub fn sequential_runner(&self) -> SequentialBatchRunner<T, R> {
        SequentialBatchRunner::from_shared(Arc::clone(&self.transform), Arc::clone(&self.reporter))
            .with_cancellation_token(self.cancel.clone())
    }

    /// 並列実行方式を作成
    pub fn concurrent_runner(&self) -> ConcurrentBatchRunner<T, C, R> {
        ConcurrentBatchRunner::from_shared(
            Arc::clone(&self.transform),
            Arc::clone(&self.config),
            Arc::clone(&self.reporter),
        )
        .with_cancellation_token(self.cancel.clone())
    }

    /// 設定された実行方式を作成
    pub fn runner(&self) -> Box<dyn BatchRunner> {
        match self.config.runner_mode() {
            RunnerMode::Sequential => Box::new(self.sequential_runner()),
            RunnerMode::Concurrent => Box::new(self.concurrent_runner()),
        }
    }

    /// 入力ディレクトリの全画像を変換して出力ディレクトリへ書き出す
    ///
    /// 1件でも変換に失敗した場合は何も書き出さずに `TransformFailed` を返す
    pub async fn process_directory(
        &self,
        input: &Path,
        output: &Path,
    ) -> ProcessingResult<PipelineSummary> {
        validate_config(self.config.as_ref())?;
        let started_at = chrono::Utc::now();

        // 読み込み
        let load_start = Instant::now();
        let LoadedBatch { paths, images } = self.source.load_batch(input).await?;
        let load_time = load_start.elapsed();
        let total_images = images.len();

        // 変換
        let runner = self.runner();
        tracing::info!(
            runner = runner.name(),
            transform = self.transform.name(),
            total_images,
            "processing batch"
        );
        let batch_output = runner.process(images).await?;
        let processing_time = batch_output.elapsed;
        let processed_images = batch_output.success_count();
        let error_count = batch_output.error_count();
        for path in batch_output.failed_paths(&paths) {
            tracing::error!(path = %path.display(), "transform failed");
        }
        let images = batch_output.into_images()?;

        // 書き出し
        let save_start = Instant::now();
        let written = self.sink.write_batch(images, output).await?;
        let save_time = save_start.elapsed();

        Ok(PipelineSummary {
            runner: runner.name().to_string(),
            total_images,
            processed_images,
            error_count,
            written_files: written.len(),
            load_time,
            processing_time,
            save_time,
            started_at,
        })
    }

    /// 同じバッチを両方の実行方式で処理して比較する
    pub async fn compare_directory(&self, input: &Path) -> ProcessingResult<RunnerComparison> {
        validate_config(self.config.as_ref())?;
        let batch = self.source.load_batch(input).await?;

        compare_runners(
            &self.sequential_runner(),
            &self.concurrent_runner(),
            batch.images,
        )
        .await
    }

    /// 設定への参照を取得
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 変換への参照を取得
    pub fn transform(&self) -> &T {
        &self.transform
    }
}
