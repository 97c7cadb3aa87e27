// 単一画像処理機能
// 両方の実行方式が共有する1件分の変換とエラー捕捉

pub mod worker;

// 公開API
pub use worker::transform_single;
