use anyhow::Result;
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use std::path::Path;

pub mod standard;

/// 画像読み込みの結果情報
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// 読み込まれた画像
    pub image: DynamicImage,
    /// デコードに使用したフォーマット
    pub format: ImageFormat,
    /// 読み込みにかかった時間（ミリ秒）
    pub load_time_ms: u64,
}

/// 画像読み込みバックエンドのトレイト
#[async_trait]
pub trait ImageLoaderBackend: Send + Sync {
    /// 画像フォーマットを指定してバイト配列から読み込む
    async fn load_with_format(&self, data: &[u8], format: ImageFormat) -> Result<LoadResult>;

    /// 読み込み戦略の名前を取得
    fn strategy_name(&self) -> &'static str;
}

/// 拡張子から画像フォーマットを判定
pub fn format_from_extension(path: &Path) -> Result<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" | "jpe" => Ok(ImageFormat::Jpeg),
        "png" => Ok(ImageFormat::Png),
        _ => anyhow::bail!("unsupported image format: .{ext} ({})", path.display()),
    }
}
