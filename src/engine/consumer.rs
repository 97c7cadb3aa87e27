// Consumer - 並列ワーカー機能

use crate::core::{ImageTransform, TransformError, WorkItem, WorkOutcome};
use crate::services::processing::transform_single;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// 単一Consumerワーカー
///
/// 共有キューから作業単位を取り出し、変換結果をインデックス付きで送信する。
/// 変換に失敗しても必ず1件の結果を送るため、完了カウントから漏れない。
pub fn spawn_single_consumer<T>(
    worker_id: usize,
    transform: Arc<T>,
    work_rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    result_tx: mpsc::Sender<WorkOutcome>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<Result<usize>>
where
    T: ImageTransform + 'static,
{
    tokio::spawn(async move {
        let mut processed = 0;

        loop {
            // 次の作業を取得
            let item = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                item = async { work_rx.lock().await.recv().await } => match item {
                    Some(item) => item,
                    None => break, // チャンネル終了
                },
            };

            let WorkItem { index, image } = item;
            tracing::trace!(worker_id, index, "worker picked up item");

            // CPU処理はブロッキングプールで実行
            let task_transform = Arc::clone(&transform);
            let result = tokio::task::spawn_blocking(move || {
                transform_single(task_transform.as_ref(), index, &image)
            })
            .await
            .unwrap_or_else(|e| Err(TransformError::new(index, format!("worker task failed: {e}"))));

            processed += 1;

            // 結果送信
            let outcome = WorkOutcome {
                index,
                worker_id,
                result,
            };
            if result_tx.send(outcome).await.is_err() {
                // コーディネーターが終了済み
                break;
            }
        }

        tracing::debug!(worker_id, processed, "worker finished");
        Ok(processed)
    })
}

/// Consumers: 固定サイズのワーカープール
pub fn spawn_consumers<T>(
    transform: Arc<T>,
    work_rx: mpsc::Receiver<WorkItem>,
    result_tx: mpsc::Sender<WorkOutcome>,
    worker_count: usize,
    cancel: CancellationToken,
) -> Vec<tokio::task::JoinHandle<Result<usize>>>
where
    T: ImageTransform + 'static,
{
    let work_rx = Arc::new(Mutex::new(work_rx));

    (0..worker_count)
        .map(|worker_id| {
            spawn_single_consumer(
                worker_id,
                Arc::clone(&transform),
                Arc::clone(&work_rx),
                result_tx.clone(),
                cancel.clone(),
            )
        })
        .collect()
}
