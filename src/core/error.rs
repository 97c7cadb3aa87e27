// バッチ処理専用のカスタムエラー型定義

use thiserror::Error;

/// 単一画像の変換失敗
///
/// 失敗したインデックスを保持し、完了カウントから外れないよう
/// ワーカーからコーディネーターへ結果として送られる
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("変換エラー: index {index} - {cause}")]
pub struct TransformError {
    pub index: usize,
    pub cause: String,
}

impl TransformError {
    pub fn new(index: usize, cause: impl Into<String>) -> Self {
        Self {
            index,
            cause: cause.into(),
        }
    }
}

/// バッチ処理固有のエラー型
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("ファイル発見エラー: {path} - {source}")]
    FileDiscoveryError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("画像読み込みエラー: {path} - {source}")]
    ImageLoadError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("画像保存エラー: {path} - {source}")]
    ImageSaveError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{failed}件の画像変換に失敗しました (最初のエラー: {first})")]
    TransformFailed {
        failed: usize,
        #[source]
        first: TransformError,
    },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("バッチ未完了: {received}/{expected} 件の結果しか受信できませんでした")]
    IncompleteBatch { expected: usize, received: usize },

    #[error("結果の重複書き込み: index {index}")]
    DuplicateResult { index: usize },

    #[error("キャンセルされました: {completed}/{total} 件完了")]
    Cancelled { completed: usize, total: usize },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("内部エラー: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl ProcessingError {
    /// ファイル発見エラーの作成
    pub fn file_discovery(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::FileDiscoveryError {
            path: path.into(),
            source,
        }
    }

    /// 画像読み込みエラーの作成
    pub fn image_load(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::ImageLoadError {
            path: path.into(),
            source,
        }
    }

    /// 画像保存エラーの作成
    pub fn image_save(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::ImageSaveError {
            path: path.into(),
            source,
        }
    }

    /// 変換失敗の集約エラーの作成
    pub fn transform_failed(failed: usize, first: TransformError) -> Self {
        Self::TransformFailed { failed, first }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// バッチ未完了エラーの作成
    pub fn incomplete_batch(expected: usize, received: usize) -> Self {
        Self::IncompleteBatch { expected, received }
    }

    /// 重複書き込みエラーの作成
    pub fn duplicate_result(index: usize) -> Self {
        Self::DuplicateResult { index }
    }

    /// キャンセルエラーの作成
    pub fn cancelled(completed: usize, total: usize) -> Self {
        Self::Cancelled { completed, total }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// 内部エラーの作成
    pub fn internal(source: anyhow::Error) -> Self {
        Self::InternalError { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::FileDiscoveryError { .. }
            | Self::ImageLoadError { .. }
            | Self::ImageSaveError { .. } => ErrorSeverity::Medium,
            Self::TransformFailed { .. } => ErrorSeverity::Medium,
            Self::ConfigurationError { .. } => ErrorSeverity::High,
            Self::Cancelled { .. } => ErrorSeverity::Low,
            Self::TaskError { .. } => ErrorSeverity::High,
            Self::IncompleteBatch { .. }
            | Self::DuplicateResult { .. }
            | Self::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// エラーが回復可能かどうかを判定
    ///
    /// 入出力や変換の失敗は入力を直せば再実行できるが、
    /// バリアの破綻は実装の不具合を意味する
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::FileDiscoveryError { .. }
            | Self::ImageLoadError { .. }
            | Self::ImageSaveError { .. }
            | Self::TransformFailed { .. }
            | Self::Cancelled { .. }
            | Self::TaskError { .. } => true,
            Self::ConfigurationError { .. } => false,
            Self::IncompleteBatch { .. }
            | Self::DuplicateResult { .. }
            | Self::InternalError { .. } => false,
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 低重要度 - ログ出力程度
    Low,
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - システム停止レベル
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// バッチ処理の結果型
pub type ProcessingResult<T> = std::result::Result<T, ProcessingError>;

impl From<anyhow::Error> for ProcessingError {
    fn from(error: anyhow::Error) -> Self {
        ProcessingError::InternalError { source: error }
    }
}

impl From<tokio::task::JoinError> for ProcessingError {
    fn from(error: tokio::task::JoinError) -> Self {
        ProcessingError::TaskError { source: error }
    }
}
