// 画像変換機能
// 固定パイプライン（拡大 + コントラスト）と遅延シミュレーション

pub mod implementations;

// 公開API
pub use implementations::{DelayedTransform, UpscaleContrastTransform};
