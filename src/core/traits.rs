// バッチ処理システムのトレイト定義
// 全ての抽象化インターフェースを定義

use super::error::ProcessingResult;
use super::types::{BatchOutput, LoadedBatch};
use async_trait::async_trait;
use image::DynamicImage;
use mockall::automock;
use std::path::{Path, PathBuf};

/// 実行方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunnerMode {
    Sequential,
    #[default]
    Concurrent,
}

impl RunnerMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Concurrent => "concurrent",
        }
    }
}

/// バッチ処理の設定を抽象化するトレイト
#[automock]
pub trait ProcessingConfig: Send + Sync {
    /// 最大同時実行タスク数（ワーカー数）を取得
    fn max_concurrent_tasks(&self) -> usize;

    /// チャンネルバッファサイズを取得
    fn channel_buffer_size(&self) -> usize;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;

    /// 使用する実行方式
    fn runner_mode(&self) -> RunnerMode;
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_images: usize);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// 変換エラー発生時の報告
    async fn report_error(&self, index: usize, error: &str);

    /// 処理完了時の報告
    async fn report_completed(&self, total_processed: usize, total_errors: usize);
}

/// 1枚の画像に対する変換
///
/// 実装は決定的な純粋関数であること。入力画像は変更せず新しい画像を返す。
#[automock]
pub trait ImageTransform: Send + Sync {
    fn apply(&self, image: &DynamicImage) -> anyhow::Result<DynamicImage>;

    /// 変換の名前（ログ用）
    fn name(&self) -> &'static str;
}

/// バッチ実行のエントリーポイント
///
/// 逐次版と並列版は同じシグネチャを持ち、同じ入力に対して同じ出力を返す
#[async_trait]
pub trait BatchRunner: Send + Sync {
    async fn process(&self, images: Vec<DynamicImage>) -> ProcessingResult<BatchOutput>;

    /// 実行方式の名前
    fn name(&self) -> &'static str;
}

/// 入力側の外部コラボレーター
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// ディレクトリから順序付きの画像列を読み込む
    async fn load_batch(&self, directory: &Path) -> ProcessingResult<LoadedBatch>;
}

/// 出力側の外部コラボレーター
#[async_trait]
pub trait ImageSink: Send + Sync {
    /// 画像列を位置インデックスに基づく名前で書き出す
    async fn write_batch(
        &self,
        images: Vec<DynamicImage>,
        directory: &Path,
    ) -> ProcessingResult<Vec<PathBuf>>;
}
