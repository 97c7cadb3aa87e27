// 出力機能
// 変換済み画像のエンコードと書き出し（バッチ処理の後段）

pub mod implementations;

// 公開API
pub use implementations::{DirectoryImageSink, MemoryImageSink, OutputFormat};
