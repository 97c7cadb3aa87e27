// Producer - 作業単位の配信機能

use crate::core::WorkItem;
use anyhow::Result;
use image::DynamicImage;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Producer: 画像をインデックス順に作業キューへ配信
///
/// 配信できた件数を返す。キャンセル時や受信側が閉じた場合はそこで停止する。
pub fn spawn_producer(
    images: Vec<DynamicImage>,
    work_tx: mpsc::Sender<WorkItem>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<Result<usize>> {
    tokio::spawn(async move {
        let mut dispatched = 0;

        for (index, image) in images.into_iter().enumerate() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                sent = work_tx.send(WorkItem { index, image }) => {
                    if sent.is_err() {
                        // 全ワーカーが終了済み
                        break;
                    }
                    dispatched += 1;
                }
            }
        }

        tracing::debug!(dispatched, "producer finished");
        // work_txをドロップしてチャンネル終了シグナル
        Ok(dispatched)
    })
}
