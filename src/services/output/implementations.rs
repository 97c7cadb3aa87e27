// 出力の具象実装

use crate::core::{ImageSink, ProcessingError, ProcessingResult};
use anyhow::Context;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// JPEG品質のデフォルト値
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// 出力ファイルのフォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// 位置インデックスに基づく出力ファイル名
pub fn output_file_name(index: usize, format: OutputFormat) -> String {
    format!("processed_{index}.{}", format.extension())
}

/// ディレクトリへ画像を書き出す出力実装
#[derive(Debug, Clone)]
pub struct DirectoryImageSink {
    format: OutputFormat,
    jpeg_quality: u8,
}

impl Default for DirectoryImageSink {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

impl DirectoryImageSink {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn encode_to_file(&self, image: &DynamicImage, path: &Path) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Jpeg => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create file: {}", path.display()))?;
                let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), self.jpeg_quality);
                // JPEGはアルファを持てないためRGB8に変換する
                DynamicImage::ImageRgb8(image.to_rgb8())
                    .write_with_encoder(encoder)
                    .context("Failed to encode JPEG")?;
            }
            OutputFormat::Png => {
                image
                    .save_with_format(path, ImageFormat::Png)
                    .context("Failed to encode PNG")?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ImageSink for DirectoryImageSink {
    async fn write_batch(
        &self,
        images: Vec<DynamicImage>,
        directory: &Path,
    ) -> ProcessingResult<Vec<PathBuf>> {
        tokio::fs::create_dir_all(directory).await.map_err(|e| {
            ProcessingError::image_save(directory.to_string_lossy(), anyhow::Error::new(e))
        })?;

        let sink = self.clone();
        let directory = directory.to_path_buf();

        // エンコードはCPU処理のためブロッキングプールで逐次実行する
        tokio::task::spawn_blocking(move || {
            let mut written = Vec::with_capacity(images.len());

            for (index, image) in images.iter().enumerate() {
                let path = directory.join(output_file_name(index, sink.format));
                sink.encode_to_file(image, &path)
                    .map_err(|e| ProcessingError::image_save(path.to_string_lossy(), e))?;

                tracing::debug!(index, path = %path.display(), "saved image");
                written.push(path);
            }

            Ok::<_, ProcessingError>(written)
        })
        .await?
    }
}

/// メモリ上に画像を保持する出力実装（テスト用）
#[derive(Debug, Clone, Default)]
pub struct MemoryImageSink {
    stored: Arc<Mutex<Vec<DynamicImage>>>,
}

impl MemoryImageSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済み画像数を取得
    pub fn stored_count(&self) -> usize {
        self.stored.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// 保存済み画像のコピーを取得
    pub fn stored_images(&self) -> Vec<DynamicImage> {
        self.stored.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageSink for MemoryImageSink {
    async fn write_batch(
        &self,
        images: Vec<DynamicImage>,
        directory: &Path,
    ) -> ProcessingResult<Vec<PathBuf>> {
        let paths = (0..images.len())
            .map(|index| directory.join(output_file_name(index, OutputFormat::Png)))
            .collect();

        let mut stored = self
            .stored
            .lock()
            .map_err(|_| ProcessingError::internal(anyhow::anyhow!("sink mutex poisoned")))?;
        stored.extend(images);

        Ok(paths)
    }
}
