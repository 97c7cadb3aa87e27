// 順序保証とバリアの統合テスト
use img_batch::{
    core::{BatchRunner, ImageTransform},
    engine::{compare_runners, ConcurrentBatchRunner, SequentialBatchRunner},
    services::{DefaultProcessingConfig, NoOpProgressReporter, UpscaleContrastTransform},
};
use std::sync::Arc;
use std::time::Duration;

#[path = "../fixtures/mod.rs"]
mod fixtures;
use fixtures::*;

fn concurrent<T: ImageTransform + 'static>(
    transform: T,
    workers: usize,
) -> ConcurrentBatchRunner<T, DefaultProcessingConfig, NoOpProgressReporter> {
    ConcurrentBatchRunner::new(
        transform,
        DefaultProcessingConfig::new(1).with_max_concurrent(workers),
        NoOpProgressReporter,
    )
}

#[tokio::test]
async fn test_concurrent_output_matches_sequential() {
    let sequential =
        SequentialBatchRunner::new(UpscaleContrastTransform::new(), NoOpProgressReporter);
    let parallel = concurrent(UpscaleContrastTransform::new(), 4);

    let expected = sequential.process(marker_batch(20)).await.unwrap();
    let actual = parallel.process(marker_batch(20)).await.unwrap();

    assert_eq!(expected.len(), actual.len());
    for (i, (left, right)) in expected.results.iter().zip(&actual.results).enumerate() {
        let left = left.as_ref().unwrap();
        let right = right.as_ref().unwrap();
        assert!(same_pixels(left, right), "index {i} differs");
    }
}

#[tokio::test]
async fn test_early_indices_completing_last_keep_their_position() {
    // [A, B, C] で A が最後に完了する
    let transform = ReverseDelayTransform::new(Duration::from_millis(40), 3);
    let parallel = concurrent(transform, 3);
    let reference = UpscaleContrastTransform::new();
    let inputs = marker_batch(3);

    let output = parallel.process(inputs.clone()).await.unwrap();

    assert_eq!(output.len(), 3);
    for (input, result) in inputs.iter().zip(&output.results) {
        let expected = reference.apply(input).unwrap();
        assert!(same_pixels(&expected, result.as_ref().unwrap()));
    }
}

#[tokio::test]
async fn test_every_index_lands_in_its_own_slot() {
    let recorder = Arc::new(RecordingTransform::default());
    let runner = ConcurrentBatchRunner::from_shared(
        Arc::clone(&recorder),
        Arc::new(DefaultProcessingConfig::new(1).with_max_concurrent(4)),
        Arc::new(NoOpProgressReporter),
    );

    let output = runner.process(marker_batch(8)).await.unwrap();

    let output_markers: Vec<u8> = output
        .results
        .iter()
        .map(|r| marker_of(r.as_ref().unwrap()))
        .collect();
    assert_eq!(output_markers, (0..8).collect::<Vec<u8>>());

    // 重複して変換されたインデックスがないこと
    let mut seen = recorder.completed();
    seen.sort_unstable();
    assert_eq!(seen, (0..8).collect::<Vec<u8>>());
}

#[tokio::test]
async fn test_concurrent_runs_are_deterministic() {
    let runner = concurrent(UpscaleContrastTransform::new(), 3);

    let first = runner.process(marker_batch(12)).await.unwrap();
    let second = runner.process(marker_batch(12)).await.unwrap();

    assert_eq!(first.results, second.results);
}

#[tokio::test]
async fn test_length_invariant_including_empty() {
    let runner = concurrent(UpscaleContrastTransform::new(), 3);

    for count in [0usize, 1, 2, 7] {
        let output = runner.process(marker_batch(count)).await.unwrap();
        assert_eq!(output.len(), count);
    }
}

#[tokio::test]
async fn test_hundred_images_no_lost_work() {
    let recorder = Arc::new(RecordingTransform::default());
    let reporter = Arc::new(CountingReporter::default());
    let runner = ConcurrentBatchRunner::from_shared(
        Arc::clone(&recorder),
        Arc::new(DefaultProcessingConfig::new(1).with_max_concurrent(8).with_buffer_size(4)),
        Arc::clone(&reporter),
    );

    let images: Vec<_> = (0..100).map(|i| marker_image(i as u8, 2, 2)).collect();
    let output = runner.process(images).await.unwrap();

    assert_eq!(output.len(), 100);
    assert_eq!(output.success_count(), 100);
    assert_eq!(reporter.progress_calls(), 100);

    // 各インデックスがちょうど1回だけ変換される
    let mut processed = recorder.completed();
    processed.sort_unstable();
    assert_eq!(processed, (0..100).map(|i| i as u8).collect::<Vec<u8>>());

    for (i, result) in output.results.iter().enumerate() {
        assert_eq!(marker_of(result.as_ref().unwrap()), i as u8);
    }
}

#[tokio::test]
async fn test_compare_runners_reports_identical_outputs() {
    let sequential =
        SequentialBatchRunner::new(UpscaleContrastTransform::new(), NoOpProgressReporter);
    let parallel = concurrent(UpscaleContrastTransform::new(), 4);

    let comparison = compare_runners(&sequential, &parallel, marker_batch(10))
        .await
        .unwrap();

    assert_eq!(comparison.total_images, 10);
    assert!(comparison.outputs_identical);
}
