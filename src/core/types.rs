// バッチ処理に関連するデータ型定義

use super::error::TransformError;
use image::DynamicImage;
use serde::Serialize;
use std::time::Duration;

/// ワーカーへ渡す作業単位
///
/// 画像の所有権はワーカーが処理を終えるまでワーカーのみが持つ
#[derive(Debug)]
pub struct WorkItem {
    pub index: usize,
    pub image: DynamicImage,
}

/// ワーカーからコーディネーターへ送られる処理結果
#[derive(Debug)]
pub struct WorkOutcome {
    pub index: usize,
    pub worker_id: usize,
    pub result: Result<DynamicImage, TransformError>,
}

/// 入力ディレクトリから読み込んだバッチ
///
/// `paths[i]` は `images[i]` の読み込み元
#[derive(Debug, Default)]
pub struct LoadedBatch {
    pub paths: Vec<std::path::PathBuf>,
    pub images: Vec<DynamicImage>,
}

impl LoadedBatch {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// 1回のバッチ実行の出力
///
/// `results[i]` は常に入力 `images[i]` に対応する
#[derive(Debug)]
pub struct BatchOutput {
    pub results: Vec<Result<DynamicImage, TransformError>>,
    pub elapsed: Duration,
}

impl BatchOutput {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }

    /// 失敗したインデックスのエラー一覧
    pub fn errors(&self) -> impl Iterator<Item = &TransformError> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    /// 失敗したインデックスに対応する読み込み元パス
    pub fn failed_paths<'a>(&self, paths: &'a [std::path::PathBuf]) -> Vec<&'a std::path::Path> {
        self.errors()
            .filter_map(|error| paths.get(error.index))
            .map(|path| path.as_path())
            .collect()
    }

    /// 全件成功した場合のみ画像列を返す
    ///
    /// 1件でも失敗があればバッチ全体を失敗として扱う
    pub fn into_images(self) -> super::ProcessingResult<Vec<DynamicImage>> {
        let failed = self.error_count();
        let mut images = Vec::with_capacity(self.results.len());
        let mut first_error = None;

        for result in self.results {
            match result {
                Ok(image) => images.push(image),
                Err(error) => {
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        match first_error {
            Some(first) => Err(super::ProcessingError::transform_failed(failed, first)),
            None => Ok(images),
        }
    }
}

/// ディレクトリ処理全体のサマリー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub runner: String,
    pub total_images: usize,
    pub processed_images: usize,
    pub error_count: usize,
    pub written_files: usize,
    #[serde(with = "duration_ms")]
    pub load_time: Duration,
    #[serde(with = "duration_ms")]
    pub processing_time: Duration,
    #[serde(with = "duration_ms")]
    pub save_time: Duration,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl PipelineSummary {
    /// 1画像あたりの平均変換時間（ミリ秒）
    pub fn average_time_per_image_ms(&self) -> f64 {
        if self.total_images > 0 {
            self.processing_time.as_secs_f64() * 1000.0 / self.total_images as f64
        } else {
            0.0
        }
    }
}

/// 逐次実行と並列実行の比較結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerComparison {
    pub total_images: usize,
    #[serde(with = "duration_ms")]
    pub sequential_time: Duration,
    #[serde(with = "duration_ms")]
    pub concurrent_time: Duration,
    pub outputs_identical: bool,
}

impl RunnerComparison {
    pub fn speedup(&self) -> f64 {
        let concurrent = self.concurrent_time.as_secs_f64();
        if concurrent > 0.0 {
            self.sequential_time.as_secs_f64() / concurrent
        } else {
            0.0
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
