// ConcurrentBatchRunner - Producer-Consumer による並列バッチ実行
// 固定サイズのワーカープールとインデックス指定のバリアで順序を保証

use super::{collector::collect_outcomes, consumer::spawn_consumers, producer::spawn_producer};
use crate::{
    core::{
        BatchOutput, BatchRunner, ImageTransform, ProcessingConfig, ProcessingResult,
        ProgressReporter, WorkItem, WorkOutcome,
    },
    services::config::implementations::validate_config,
};
use async_trait::async_trait;
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// 並列バッチ実行
///
/// 出力は同じ入力に対する [`SequentialBatchRunner`](super::SequentialBatchRunner) の出力と一致する。
pub struct ConcurrentBatchRunner<T, C, R> {
    transform: Arc<T>,
    config: Arc<C>,
    reporter: Arc<R>,
    cancel: CancellationToken,
}

impl<T, C, R> ConcurrentBatchRunner<T, C, R>
where
    T: ImageTransform + 'static,
    C: ProcessingConfig,
    R: ProgressReporter + 'static,
{
    pub fn new(transform: T, config: C, reporter: R) -> Self {
        Self::from_shared(Arc::new(transform), Arc::new(config), Arc::new(reporter))
    }

    /// 既にArcで管理されている依存関係から作成
    pub fn from_shared(transform: Arc<T>, config: Arc<C>, reporter: Arc<R>) -> Self {
        Self {
            transform,
            config,
            reporter,
            cancel: CancellationToken::new(),
        }
    }

    /// 外部から実行を中断するためのトークンを設定
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// バッチサイズに対して実際に起動するワーカー数
    pub fn worker_count(&self, total: usize) -> usize {
        self.config.max_concurrent_tasks().min(total)
    }

    async fn run(
        &self,
        images: Vec<DynamicImage>,
        cancel: CancellationToken,
    ) -> ProcessingResult<BatchOutput> {
        validate_config(self.config.as_ref())?;

        let start_time = Instant::now();
        let total = images.len();
        self.reporter.report_started(total).await;

        if total == 0 {
            self.reporter.report_completed(0, 0).await;
            return Ok(BatchOutput {
                results: Vec::new(),
                elapsed: start_time.elapsed(),
            });
        }

        let buffer_size = self.config.channel_buffer_size();
        let worker_count = self.worker_count(total);

        // Producer-Consumerチャンネル構築
        let (work_tx, work_rx) = mpsc::channel::<WorkItem>(buffer_size);
        let (result_tx, mut result_rx) = mpsc::channel::<WorkOutcome>(buffer_size);

        // Producer起動
        let producer_handle = spawn_producer(images, work_tx, cancel.clone());

        // Consumer Pool起動
        let consumer_handles = spawn_consumers(
            Arc::clone(&self.transform),
            work_rx,
            result_tx,
            worker_count,
            cancel.clone(),
        );

        // N件揃うまで待機
        let collected =
            collect_outcomes(&mut result_rx, total, self.reporter.as_ref(), &cancel).await;

        if collected.is_err() {
            // 残りのタスクを停止させる
            cancel.cancel();
        }
        drop(result_rx);

        // 全タスクの終了を待機
        let producer_result = producer_handle.await;
        let mut consumer_results = Vec::with_capacity(consumer_handles.len());
        for handle in consumer_handles {
            consumer_results.push(handle.await);
        }

        let results = collected?;
        producer_result??;
        for result in consumer_results {
            result??;
        }

        let output = BatchOutput {
            results,
            elapsed: start_time.elapsed(),
        };

        self.reporter
            .report_completed(output.success_count(), output.error_count())
            .await;

        tracing::info!(
            runner = self.name(),
            total,
            workers = worker_count,
            errors = output.error_count(),
            elapsed_ms = output.elapsed.as_millis() as u64,
            "batch finished"
        );

        Ok(output)
    }
}

#[async_trait]
impl<T, C, R> BatchRunner for ConcurrentBatchRunner<T, C, R>
where
    T: ImageTransform + 'static,
    C: ProcessingConfig,
    R: ProgressReporter + 'static,
{
    async fn process(&self, images: Vec<DynamicImage>) -> ProcessingResult<BatchOutput> {
        // 実行内部での停止が呼び出し元のトークンへ波及しないよう子トークンを使う
        self.run(images, self.cancel.child_token()).await
    }

    fn name(&self) -> &'static str {
        "concurrent"
    }
}
