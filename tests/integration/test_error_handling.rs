// エラーハンドリングの統合テスト
use anyhow::Result;
use img_batch::{
    core::{BatchRunner, ProcessingError},
    engine::{ConcurrentBatchRunner, ProcessingEngine, SequentialBatchRunner},
    image_loader::standard::StandardImageLoader,
    services::{
        DefaultProcessingConfig, DelayedTransform, DirectoryImageSink, DirectoryImageSource,
        MemoryImageSink, NoOpProgressReporter, OutputFormat, UpscaleContrastTransform,
    },
    storage::local::LocalStorageBackend,
};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[path = "../fixtures/mod.rs"]
mod fixtures;
use fixtures::*;

fn source() -> DirectoryImageSource<LocalStorageBackend, StandardImageLoader> {
    DirectoryImageSource::new(LocalStorageBackend::new(), StandardImageLoader::new())
}

#[tokio::test]
async fn test_failing_transform_still_counts_toward_barrier() {
    let reporter = Arc::new(CountingReporter::default());
    let runner = ConcurrentBatchRunner::from_shared(
        Arc::new(FailingAtTransform { fail_marker: 3 }),
        Arc::new(DefaultProcessingConfig::new(2)),
        Arc::clone(&reporter),
    );

    let output = runner.process(marker_batch(6)).await.unwrap();

    assert_eq!(output.len(), 6);
    assert_eq!(output.error_count(), 1);
    let error = output.results[3].as_ref().unwrap_err();
    assert_eq!(error.index, 3);
    assert!(error.cause.contains("refusing marker 3"));
    assert_eq!(reporter.error_indices(), vec![3]);
    assert_eq!(reporter.progress_calls(), 6);
}

#[tokio::test]
async fn test_panicking_transform_is_captured_in_both_runners() {
    let sequential =
        SequentialBatchRunner::new(PanickingAtTransform { panic_marker: 1 }, NoOpProgressReporter);
    let concurrent = ConcurrentBatchRunner::new(
        PanickingAtTransform { panic_marker: 1 },
        DefaultProcessingConfig::new(2),
        NoOpProgressReporter,
    );

    let sequential_output = sequential.process(marker_batch(4)).await.unwrap();
    let concurrent_output = concurrent.process(marker_batch(4)).await.unwrap();

    for output in [&sequential_output, &concurrent_output] {
        assert_eq!(output.len(), 4);
        assert_eq!(output.error_count(), 1);
        let error = output.results[1].as_ref().unwrap_err();
        assert!(error.cause.contains("panicked"));
        assert!(error.cause.contains("corrupted raster"));
    }
    assert_eq!(sequential_output.results, concurrent_output.results);
}

#[tokio::test]
async fn test_transform_failure_fails_whole_batch_before_writing() -> Result<()> {
    let input = create_image_directory(4);
    let output = TempDir::new()?;
    let reporter = CountingReporter::default();

    let engine = ProcessingEngine::new(
        source(),
        DirectoryImageSink::new(OutputFormat::Png),
        FailingAtTransform { fail_marker: 2 },
        DefaultProcessingConfig::new(2),
        reporter,
    );

    let error = engine
        .process_directory(input.path(), &output.path().join("out"))
        .await
        .unwrap_err();

    match error {
        ProcessingError::TransformFailed { failed, first } => {
            assert_eq!(failed, 1);
            assert_eq!(first.index, 2);
        }
        other => panic!("Expected TransformFailed, got {other:?}"),
    }
    assert_eq!(engine.reporter().error_indices(), vec![2]);
    assert!(!output.path().join("out").exists());
    Ok(())
}

#[tokio::test]
async fn test_corrupted_image_aborts_before_processing() -> Result<()> {
    let input = create_image_directory(2);
    fs::write(input.path().join("img_001_broken.png"), b"INVALID_PNG_DATA")?;
    let sink = MemoryImageSink::new();

    let engine = ProcessingEngine::new(
        source(),
        sink.clone(),
        UpscaleContrastTransform::new(),
        DefaultProcessingConfig::new(2),
        NoOpProgressReporter,
    );

    let error = engine
        .process_directory(input.path(), std::path::Path::new("unused"))
        .await
        .unwrap_err();

    match error {
        ProcessingError::ImageLoadError { path, .. } => {
            assert!(path.contains("img_001_broken.png"));
        }
        other => panic!("Expected ImageLoadError, got {other:?}"),
    }
    assert_eq!(sink.stored_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unsupported_file_aborts_before_processing() -> Result<()> {
    let input = create_image_directory(3);
    fs::write(input.path().join("notes.txt"), "not an image")?;
    let sink = MemoryImageSink::new();

    let engine = ProcessingEngine::new(
        source(),
        sink.clone(),
        UpscaleContrastTransform::new(),
        DefaultProcessingConfig::new(2),
        NoOpProgressReporter,
    );

    let error = engine
        .process_directory(input.path(), std::path::Path::new("unused"))
        .await
        .unwrap_err();

    match error {
        ProcessingError::ImageLoadError { path, source } => {
            assert!(path.ends_with("notes.txt"));
            assert!(source.to_string().contains("unsupported image format"));
        }
        other => panic!("Expected ImageLoadError, got {other:?}"),
    }
    assert_eq!(sink.stored_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_nonexistent_input_directory() {
    let engine = ProcessingEngine::new(
        source(),
        MemoryImageSink::new(),
        UpscaleContrastTransform::new(),
        DefaultProcessingConfig::new(2),
        NoOpProgressReporter,
    );

    let error = engine
        .process_directory(
            std::path::Path::new("/nonexistent/input/dir"),
            std::path::Path::new("unused"),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, ProcessingError::FileDiscoveryError { .. }));
    assert!(error.is_recoverable());
}

#[tokio::test]
async fn test_unwritable_output_directory() -> Result<()> {
    let input = create_image_directory(1);
    let blocker = TempDir::new()?;
    // 出力先のパスに通常ファイルを置いてディレクトリ作成を失敗させる
    let output_path = blocker.path().join("occupied");
    fs::write(&output_path, b"not a directory")?;

    let engine = ProcessingEngine::new(
        source(),
        DirectoryImageSink::default(),
        UpscaleContrastTransform::new(),
        DefaultProcessingConfig::new(2),
        NoOpProgressReporter,
    );

    let error = engine
        .process_directory(input.path(), &output_path)
        .await
        .unwrap_err();

    assert!(matches!(error, ProcessingError::ImageSaveError { .. }));
    Ok(())
}

#[tokio::test]
async fn test_cancellation_returns_no_partial_output() {
    let input = create_image_directory(12);
    let sink = MemoryImageSink::new();

    let engine = ProcessingEngine::new(
        source(),
        sink.clone(),
        DelayedTransform::new(UpscaleContrastTransform::new(), Duration::from_millis(40)),
        DefaultProcessingConfig::new(1).with_max_concurrent(2),
        NoOpProgressReporter,
    );

    let cancel = engine.cancellation_token();
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        cancel.cancel();
    });

    let error = engine
        .process_directory(input.path(), std::path::Path::new("unused"))
        .await
        .unwrap_err();
    canceller.await.unwrap();

    match error {
        ProcessingError::Cancelled { completed, total } => {
            assert!(completed < total);
            assert_eq!(total, 12);
        }
        other => panic!("Expected Cancelled, got {other:?}"),
    }
    assert_eq!(sink.stored_count(), 0);
}

#[tokio::test]
async fn test_zero_workers_is_configuration_error() {
    let runner = ConcurrentBatchRunner::new(
        UpscaleContrastTransform::new(),
        DefaultProcessingConfig::new(1).with_max_concurrent(0),
        NoOpProgressReporter,
    );

    let error = runner.process(marker_batch(2)).await.unwrap_err();

    assert!(matches!(error, ProcessingError::ConfigurationError { .. }));
    assert!(!error.is_recoverable());
}
