pub mod cli;
pub mod core;
pub mod engine;
pub mod image_loader;
pub mod services;
pub mod storage;

// 主要APIの再エクスポート
pub use crate::core::{
    BatchOutput, BatchRunner, ImageTransform, ProcessingError, ProcessingResult, TransformError,
};
pub use engine::{ConcurrentBatchRunner, ProcessingEngine, SequentialBatchRunner};
