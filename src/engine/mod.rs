// エンジン層 - バッチ実行とオーケストレーション
// サービス層を組み合わせて高レベルな処理を提供

pub mod api;
pub mod collector;
pub mod concurrent;
pub mod consumer;
pub mod processing_engine;
pub mod producer;
pub mod sequential;

// 公開API - 主要エンジンクラス
pub use api::{
    compare_runners, create_default_processing_engine, create_quiet_processing_engine,
    outputs_match, DirectoryEngine,
};
pub use collector::{collect_outcomes, ResultSlots};
pub use concurrent::ConcurrentBatchRunner;
pub use processing_engine::ProcessingEngine;
pub use sequential::SequentialBatchRunner;
