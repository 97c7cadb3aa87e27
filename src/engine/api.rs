// 高レベル公開API
// ProcessingEngineの作成と実行方式の比較を簡単に行うための便利な関数

use super::ProcessingEngine;
use crate::{
    core::{BatchOutput, BatchRunner, ImageSink, ProcessingResult, RunnerComparison},
    image_loader::ImageLoaderBackend,
    services::{
        ConsoleProgressReporter, DefaultProcessingConfig, DirectoryImageSource,
        NoOpProgressReporter, UpscaleContrastTransform,
    },
    storage::StorageBackend,
};
use image::DynamicImage;

/// 標準の変換を使うディレクトリ処理エンジン
pub type DirectoryEngine<S, L, K, R> =
    ProcessingEngine<DirectoryImageSource<S, L>, K, UpscaleContrastTransform, DefaultProcessingConfig, R>;

/// 逐次実行と並列実行で同じバッチを処理し、結果と所要時間を比較する
///
/// 並列実行の結果が逐次実行の結果と要素ごとに一致するかを検証する
pub async fn compare_runners(
    sequential: &dyn BatchRunner,
    concurrent: &dyn BatchRunner,
    images: Vec<DynamicImage>,
) -> ProcessingResult<RunnerComparison> {
    let total_images = images.len();

    let sequential_output = sequential.process(images.clone()).await?;
    let concurrent_output = concurrent.process(images).await?;

    let outputs_identical = outputs_match(&sequential_output, &concurrent_output);
    if !outputs_identical {
        tracing::error!(total_images, "sequential and concurrent outputs differ");
    }

    Ok(RunnerComparison {
        total_images,
        sequential_time: sequential_output.elapsed,
        concurrent_time: concurrent_output.elapsed,
        outputs_identical,
    })
}

/// 2つの出力が要素ごとに一致するか（ピクセル単位）
pub fn outputs_match(left: &BatchOutput, right: &BatchOutput) -> bool {
    left.results == right.results
}

/// ProcessingEngine作成のヘルパー関数
///
/// デフォルト設定とコンソール進捗表示でのエンジン作成
pub fn create_default_processing_engine<S, L, K>(
    storage: S,
    loader: L,
    sink: K,
) -> DirectoryEngine<S, L, K, ConsoleProgressReporter>
where
    S: StorageBackend + 'static,
    L: ImageLoaderBackend + 'static,
    K: ImageSink,
{
    ProcessingEngine::new(
        DirectoryImageSource::new(storage, loader),
        sink,
        UpscaleContrastTransform::new(),
        DefaultProcessingConfig::default(),
        ConsoleProgressReporter::new(),
    )
}

/// ProcessingEngine作成のヘルパー関数（静音版）
///
/// テストやバックグラウンド処理用
pub fn create_quiet_processing_engine<S, L, K>(
    storage: S,
    loader: L,
    sink: K,
) -> DirectoryEngine<S, L, K, NoOpProgressReporter>
where
    S: StorageBackend + 'static,
    L: ImageLoaderBackend + 'static,
    K: ImageSink,
{
    ProcessingEngine::new(
        DirectoryImageSource::new(storage, loader),
        sink,
        UpscaleContrastTransform::new(),
        DefaultProcessingConfig::default(),
        NoOpProgressReporter,
    )
}
