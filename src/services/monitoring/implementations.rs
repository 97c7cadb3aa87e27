// 進捗監視の具象実装

use crate::core::ProgressReporter;
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    /// 進捗を表示すべきタイミングかどうか
    fn should_print_progress(completed: usize, total: usize) -> bool {
        let step = (total / 10).max(1);
        completed % step == 0 || completed == total
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_images: usize) {
        if !self.quiet {
            println!("🚀 Starting processing {total_images} images...");
        }
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        if !self.quiet && total > 0 && Self::should_print_progress(completed, total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            println!("📊 Progress: {completed}/{total} ({percentage:.1}%)");
        }
    }

    async fn report_error(&self, index: usize, error: &str) {
        if !self.quiet {
            eprintln!("❌ Error transforming image #{index}: {error}");
        }
    }

    async fn report_completed(&self, total_processed: usize, total_errors: usize) {
        if !self.quiet {
            println!("✅ Completed! Processed: {total_processed}, Errors: {total_errors}");
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_images: usize) {}

    async fn report_progress(&self, _completed: usize, _total: usize) {}

    async fn report_error(&self, _index: usize, _error: &str) {}

    async fn report_completed(&self, _total_processed: usize, _total_errors: usize) {}
}
