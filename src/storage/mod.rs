use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

pub mod local;

/// ストレージ内のアイテムを表す構造体
#[derive(Debug, Clone)]
pub struct StorageItem {
    /// アイテムの識別子（ローカルならパス）
    pub id: String,
    /// アイテム名（ファイル名）
    pub name: String,
    /// アイテムのサイズ（バイト）
    pub size: u64,
    /// アイテムがディレクトリかどうか
    pub is_directory: bool,
    /// 拡張子（あれば）
    pub extension: Option<String>,
}

/// ストレージバックエンドのトレイト
#[automock]
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// 以下の全てのアイテムを再帰的にリストする
    async fn list_items_recursive(&self, prefix: &str) -> Result<Vec<StorageItem>>;

    /// アイテムのデータを読み込む
    async fn read_item(&self, id: &str) -> Result<Vec<u8>>;
}
