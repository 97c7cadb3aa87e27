// 入力機能
// ディレクトリ走査と画像デコード（バッチ処理の前段）

pub mod implementations;

// 公開API
pub use implementations::DirectoryImageSource;
