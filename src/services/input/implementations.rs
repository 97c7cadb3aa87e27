// 入力の具象実装

use crate::core::{ImageSource, LoadedBatch, ProcessingError, ProcessingResult};
use crate::image_loader::{format_from_extension, ImageLoaderBackend, LoadResult};
use crate::storage::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// ディレクトリ以下の画像を順序付きで読み込む入力実装
///
/// 走査は再帰的に行い、パスの辞書順でバッチの順序を決める。
/// ディレクトリ以外の全ファイルを画像として扱い、未対応の拡張子や
/// 最初の読み込み失敗でバッチ全体を中断する。
#[derive(Debug, Clone)]
pub struct DirectoryImageSource<S, L> {
    storage: S,
    loader: L,
}

impl<S, L> DirectoryImageSource<S, L>
where
    S: StorageBackend,
    L: ImageLoaderBackend,
{
    pub fn new(storage: S, loader: L) -> Self {
        Self { storage, loader }
    }

    /// ディレクトリ以下のファイルを発見
    pub async fn discover_files(&self, directory: &Path) -> ProcessingResult<Vec<PathBuf>> {
        let dir = directory.to_string_lossy();
        let items = self
            .storage
            .list_items_recursive(&dir)
            .await
            .map_err(|e| ProcessingError::file_discovery(dir.as_ref(), e))?;

        let mut files: Vec<PathBuf> = items
            .into_iter()
            .filter(|item| !item.is_directory)
            .map(|item| PathBuf::from(item.id))
            .collect();

        files.sort(); // 一貫した順序で処理
        Ok(files)
    }

    /// ストレージから読み出し、拡張子のフォーマットでデコード
    async fn load_one(&self, path: &Path) -> anyhow::Result<LoadResult> {
        let format = format_from_extension(path)?;
        let data = self.storage.read_item(&path.to_string_lossy()).await?;
        self.loader.load_with_format(&data, format).await
    }
}

#[async_trait]
impl<S, L> ImageSource for DirectoryImageSource<S, L>
where
    S: StorageBackend,
    L: ImageLoaderBackend,
{
    async fn load_batch(&self, directory: &Path) -> ProcessingResult<LoadedBatch> {
        let paths = self.discover_files(directory).await?;
        let mut images = Vec::with_capacity(paths.len());

        for path in &paths {
            let loaded = self
                .load_one(path)
                .await
                .map_err(|e| ProcessingError::image_load(path.to_string_lossy(), e))?;

            tracing::debug!(
                path = %path.display(),
                width = loaded.image.width(),
                height = loaded.image.height(),
                load_time_ms = loaded.load_time_ms,
                "loaded image"
            );
            images.push(loaded.image);
        }

        tracing::info!(
            count = images.len(),
            directory = %directory.display(),
            loader = self.loader.strategy_name(),
            "loaded batch"
        );
        Ok(LoadedBatch { paths, images })
    }
}
