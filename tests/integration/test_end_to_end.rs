// エンドツーエンド統合テスト
use img_batch::{
    cli::{execute_compare, execute_run, CompareConfig, EngineSettings, RunConfig},
    core::RunnerMode,
    engine::{create_quiet_processing_engine, ProcessingEngine},
    image_loader::standard::StandardImageLoader,
    services::{
        DefaultProcessingConfig, DirectoryImageSink, DirectoryImageSource, NoOpProgressReporter,
        OutputFormat, UpscaleContrastTransform,
    },
    storage::local::LocalStorageBackend,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

#[path = "../fixtures/mod.rs"]
mod fixtures;
use fixtures::*;

/// テスト環境をセットアップ：サブディレクトリとJPEG/PNGが混在するディレクトリを作成
fn setup_test_images(base_dir: &Path) {
    let nested = base_dir.join("b_nested");
    fs::create_dir_all(&nested).unwrap();

    marker_image(0, 4, 2).save(base_dir.join("a.png")).unwrap();
    marker_image(1, 3, 3).save(nested.join("c.png")).unwrap();
    marker_image(2, 5, 1).to_rgb8().save(base_dir.join("d.jpg")).unwrap();
}

fn settings(mode: RunnerMode, format: OutputFormat) -> EngineSettings {
    EngineSettings {
        mode,
        workers: Some(3),
        format,
        delay: Duration::ZERO,
        quiet: true,
    }
}

#[tokio::test]
async fn test_directory_to_directory_jpeg() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    setup_test_images(input.path());

    let engine = create_quiet_processing_engine(
        LocalStorageBackend::new(),
        StandardImageLoader::new(),
        DirectoryImageSink::default(),
    );

    let summary = engine
        .process_directory(input.path(), output.path())
        .await
        .unwrap();

    assert_eq!(summary.total_images, 3);
    assert_eq!(summary.written_files, 3);
    assert_eq!(summary.error_count, 0);

    // パスの辞書順: a.png, b_nested/c.png, d.jpg
    let expected_dims = [(8, 4), (6, 6), (10, 2)];
    for (i, dims) in expected_dims.iter().enumerate() {
        let written = image::open(output.path().join(format!("processed_{i}.jpg"))).unwrap();
        assert_eq!((written.width(), written.height()), *dims);
    }
    assert!(!output.path().join("processed_3.jpg").exists());
}

#[tokio::test]
async fn test_sequential_and_concurrent_write_identical_png_files() {
    let input = create_image_directory(6);
    let sequential_out = TempDir::new().unwrap();
    let concurrent_out = TempDir::new().unwrap();

    for (mode, out) in [
        (RunnerMode::Sequential, &sequential_out),
        (RunnerMode::Concurrent, &concurrent_out),
    ] {
        let engine = ProcessingEngine::new(
            DirectoryImageSource::new(LocalStorageBackend::new(), StandardImageLoader::new()),
            DirectoryImageSink::new(OutputFormat::Png),
            UpscaleContrastTransform::new(),
            DefaultProcessingConfig::new(2).with_runner_mode(mode),
            NoOpProgressReporter,
        );
        let summary = engine.process_directory(input.path(), out.path()).await.unwrap();
        assert_eq!(summary.runner, mode.as_str());
    }

    for i in 0..6 {
        let name = format!("processed_{i}.png");
        let left = image::open(sequential_out.path().join(&name)).unwrap();
        let right = image::open(concurrent_out.path().join(&name)).unwrap();
        assert!(same_pixels(&left, &right), "{name} differs");
    }
}

#[tokio::test]
async fn test_empty_directory_produces_empty_output() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let engine = create_quiet_processing_engine(
        LocalStorageBackend::new(),
        StandardImageLoader::new(),
        DirectoryImageSink::default(),
    );

    let summary = engine
        .process_directory(input.path(), &output.path().join("out"))
        .await
        .unwrap();

    assert_eq!(summary.total_images, 0);
    assert_eq!(summary.written_files, 0);
    assert_eq!(fs::read_dir(output.path().join("out")).unwrap().count(), 0);
}

#[tokio::test]
async fn test_run_command_with_report() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    setup_test_images(input.path());
    let report = output.path().join("summary.json");

    execute_run(RunConfig {
        input_directory: input.path().to_path_buf(),
        output_directory: output.path().join("processed"),
        report: Some(report.clone()),
        engine: settings(RunnerMode::Sequential, OutputFormat::Png),
    })
    .await
    .unwrap();

    let json: Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["runner"], "sequential");
    assert_eq!(json["total_images"], 3);
    assert_eq!(json["processed_images"], 3);
    assert!(json["processing_time"].is_u64());
    assert!(json["started_at"].is_string());

    assert!(output.path().join("processed/processed_2.png").exists());
}

#[tokio::test]
async fn test_compare_command() {
    let input = create_image_directory(5);

    let comparison = execute_compare(CompareConfig {
        input_directory: input.path().to_path_buf(),
        engine: settings(RunnerMode::Concurrent, OutputFormat::Jpeg),
    })
    .await
    .unwrap();

    assert_eq!(comparison.total_images, 5);
    assert!(comparison.outputs_identical);
}

#[tokio::test]
async fn test_delay_shows_concurrent_speedup() {
    let input = create_image_directory(4);
    let mut engine_settings = settings(RunnerMode::Concurrent, OutputFormat::Jpeg);
    engine_settings.workers = Some(4);
    engine_settings.delay = Duration::from_millis(100);

    let comparison = execute_compare(CompareConfig {
        input_directory: input.path().to_path_buf(),
        engine: engine_settings,
    })
    .await
    .unwrap();

    assert!(comparison.sequential_time >= Duration::from_millis(400));
    assert!(comparison.concurrent_time < comparison.sequential_time);
    assert!(comparison.outputs_identical);
}
