use super::{StorageBackend, StorageItem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use walkdir::WalkDir;

/// ローカルファイルシステム用のストレージバックエンド
#[derive(Debug, Clone, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }

    fn path_to_storage_item(path: &Path) -> Result<StorageItem> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let extension = if metadata.is_file() {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_string())
        } else {
            None
        };

        Ok(StorageItem {
            id: path.to_string_lossy().to_string(),
            name,
            size: metadata.len(),
            is_directory: metadata.is_dir(),
            extension,
        })
    }
}

#[async_trait]
impl StorageBackend for LocalStorageBackend {
    async fn list_items_recursive(&self, prefix: &str) -> Result<Vec<StorageItem>> {
        let root = Path::new(prefix).to_path_buf();

        // walkdirは同期APIのためブロッキングプールで走査する
        tokio::task::spawn_blocking(move || {
            let mut items = Vec::new();

            for entry in WalkDir::new(&root).min_depth(1) {
                let entry = entry
                    .with_context(|| format!("Failed to walk directory: {}", root.display()))?;
                items.push(Self::path_to_storage_item(entry.path())?);
            }

            Ok::<_, anyhow::Error>(items)
        })
        .await
        .context("Failed to spawn blocking task for directory walk")?
    }

    async fn read_item(&self, id: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(Path::new(id))
            .await
            .with_context(|| format!("Failed to read file: {id}"))?;
        Ok(data)
    }
}
