// Collector - インデックス指定の結果集約とカウント付きバリア

use crate::core::{ProcessingError, ProcessingResult, ProgressReporter, TransformError, WorkOutcome};
use image::DynamicImage;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

type SlotResult = Result<DynamicImage, TransformError>;

/// バッチサイズ分の結果スロット
///
/// 各スロットはインデックス指定で1回だけ書き込まれる。
/// 全スロットが埋まるまで結果は取り出せない。
#[derive(Debug)]
pub struct ResultSlots {
    slots: Vec<Option<SlotResult>>,
    filled: usize,
}

impl ResultSlots {
    pub fn new(len: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
            filled: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 書き込み済みスロット数
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_complete(&self) -> bool {
        self.filled == self.slots.len()
    }

    /// 結果を `index` のスロットへ記録
    pub fn record(&mut self, index: usize, result: SlotResult) -> ProcessingResult<()> {
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            ProcessingError::internal(anyhow::anyhow!(
                "result index {index} is out of range for a batch of {len}"
            ))
        })?;

        if slot.is_some() {
            return Err(ProcessingError::duplicate_result(index));
        }

        *slot = Some(result);
        self.filled += 1;
        Ok(())
    }

    /// 全件揃った結果を入力順で取り出す
    pub fn into_results(self) -> ProcessingResult<Vec<SlotResult>> {
        if !self.is_complete() {
            return Err(ProcessingError::incomplete_batch(self.slots.len(), self.filled));
        }

        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| ProcessingError::incomplete_batch(index + 1, index))
            })
            .collect()
    }
}

/// ちょうど `total` 件の結果を受信するまで待機し、入力順に並べて返す
///
/// チャンネルが先に閉じた場合は `IncompleteBatch`、
/// キャンセル時は `Cancelled` を返し、部分的な結果は返さない。
pub async fn collect_outcomes<R>(
    result_rx: &mut mpsc::Receiver<WorkOutcome>,
    total: usize,
    reporter: &R,
    cancel: &CancellationToken,
) -> ProcessingResult<Vec<SlotResult>>
where
    R: ProgressReporter + ?Sized,
{
    let mut slots = ResultSlots::new(total);

    while !slots.is_complete() {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(ProcessingError::cancelled(slots.filled(), total));
            }
            outcome = result_rx.recv() => outcome,
        };

        let Some(WorkOutcome {
            index,
            worker_id,
            result,
        }) = outcome
        else {
            tracing::warn!(expected = total, received = slots.filled(), "result channel closed early");
            return Err(ProcessingError::incomplete_batch(total, slots.filled()));
        };

        if let Err(error) = &result {
            tracing::warn!(index, worker_id, cause = %error.cause, "transform failed");
            reporter.report_error(index, &error.cause).await;
        }

        slots.record(index, result)?;
        reporter.report_progress(slots.filled(), total).await;
    }

    slots.into_results()
}
