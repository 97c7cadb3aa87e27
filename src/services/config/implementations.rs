// 設定管理の具象実装

use crate::core::{ProcessingConfig, ProcessingError, ProcessingResult, RunnerMode};

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultProcessingConfig {
    max_concurrent: usize,
    buffer_size: usize,
    enable_progress: bool,
    mode: RunnerMode,
}

impl DefaultProcessingConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            max_concurrent: cpu_count.max(1) * 2,
            buffer_size: 100,
            enable_progress: true,
            mode: RunnerMode::Concurrent,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    pub fn with_runner_mode(mut self, mode: RunnerMode) -> Self {
        self.mode = mode;
        self
    }

    /// 設定値を検証
    pub fn validate(&self) -> ProcessingResult<()> {
        validate_config(self)
    }
}

impl Default for DefaultProcessingConfig {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl ProcessingConfig for DefaultProcessingConfig {
    fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }

    fn runner_mode(&self) -> RunnerMode {
        self.mode
    }
}

/// 任意の設定実装に対する共通検証
pub fn validate_config<C: ProcessingConfig + ?Sized>(config: &C) -> ProcessingResult<()> {
    if config.max_concurrent_tasks() == 0 {
        return Err(ProcessingError::configuration(
            "並列タスク数は1以上である必要があります",
        ));
    }

    if config.channel_buffer_size() == 0 {
        return Err(ProcessingError::configuration(
            "チャンネルバッファサイズは1以上である必要があります",
        ));
    }

    Ok(())
}
