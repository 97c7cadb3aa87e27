// 設定管理機能
// 並列度、チャンネルバッファ、実行方式の設定と検証

pub mod implementations;

// 公開API
pub use implementations::DefaultProcessingConfig;
