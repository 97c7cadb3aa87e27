// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod config;
pub mod input;
pub mod monitoring;
pub mod output;
pub mod processing;
pub mod transform;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::DefaultProcessingConfig;
pub use input::DirectoryImageSource;
pub use monitoring::{ConsoleProgressReporter, NoOpProgressReporter};
pub use output::{DirectoryImageSink, MemoryImageSink, OutputFormat};
pub use processing::transform_single;
pub use transform::{DelayedTransform, UpscaleContrastTransform};
