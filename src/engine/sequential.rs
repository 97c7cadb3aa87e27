// SequentialBatchRunner - 逐次実行によるベースライン

use crate::{
    core::{
        BatchOutput, BatchRunner, ImageTransform, ProcessingError, ProcessingResult,
        ProgressReporter, TransformError,
    },
    services::processing::transform_single,
};
use async_trait::async_trait;
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// インデックス順に1枚ずつ変換する実行方式
pub struct SequentialBatchRunner<T, R> {
    transform: Arc<T>,
    reporter: Arc<R>,
    cancel: CancellationToken,
}

impl<T, R> SequentialBatchRunner<T, R>
where
    T: ImageTransform + 'static,
    R: ProgressReporter + 'static,
{
    pub fn new(transform: T, reporter: R) -> Self {
        Self::from_shared(Arc::new(transform), Arc::new(reporter))
    }

    pub fn from_shared(transform: Arc<T>, reporter: Arc<R>) -> Self {
        Self {
            transform,
            reporter,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[async_trait]
impl<T, R> BatchRunner for SequentialBatchRunner<T, R>
where
    T: ImageTransform + 'static,
    R: ProgressReporter + 'static,
{
    async fn process(&self, images: Vec<DynamicImage>) -> ProcessingResult<BatchOutput> {
        let start_time = Instant::now();
        let total = images.len();
        self.reporter.report_started(total).await;

        let mut results = Vec::with_capacity(total);

        for (index, image) in images.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(ProcessingError::cancelled(index, total));
            }

            let transform = Arc::clone(&self.transform);
            let result =
                tokio::task::spawn_blocking(move || transform_single(transform.as_ref(), index, &image))
                    .await
                    .unwrap_or_else(|e| {
                        Err(TransformError::new(index, format!("worker task failed: {e}")))
                    });

            if let Err(error) = &result {
                tracing::warn!(index, cause = %error.cause, "transform failed");
                self.reporter.report_error(index, &error.cause).await;
            }

            results.push(result);
            self.reporter.report_progress(index + 1, total).await;
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
            errors = output.error_count(),
            elapsed_ms = output.elapsed.as_millis() as u64,
            "batch finished"
        );

        Ok(output)
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
