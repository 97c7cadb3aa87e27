use super::{ImageLoaderBackend, LoadResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use image::ImageFormat;
use std::io::Cursor;
use std::time::Instant;

/// 標準的な画像ローダー実装
#[derive(Clone, Debug, Default)]
pub struct StandardImageLoader;

impl StandardImageLoader {
    /// 新しい標準画像ローダーを作成
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageLoaderBackend for StandardImageLoader {
    async fn load_with_format(&self, data: &[u8], format: ImageFormat) -> Result<LoadResult> {
        let start_time = Instant::now();

        let image = tokio::task::spawn_blocking({
            let data = data.to_vec();
            move || image::load(Cursor::new(data), format)
        })
        .await
        .context("Failed to spawn blocking task for image loading")?
        .with_context(|| format!("Failed to decode image with format: {format:?}"))?;

        Ok(LoadResult {
            image,
            format,
            load_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    fn strategy_name(&self) -> &'static str {
        "Standard"
    }
}
