// Worker - 単一画像処理機能

use crate::core::{ImageTransform, TransformError};
use image::DynamicImage;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// 単一画像の変換
///
/// 変換のエラーとパニックはどちらもインデックス付きの `TransformError` に変換する
pub fn transform_single<T>(
    transform: &T,
    index: usize,
    image: &DynamicImage,
) -> Result<DynamicImage, TransformError>
where
    T: ImageTransform + ?Sized,
{
    let start_time = Instant::now();

    let result = match catch_unwind(AssertUnwindSafe(|| transform.apply(image))) {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(error)) => Err(TransformError::new(index, format!("{error:#}"))),
        Err(payload) => Err(TransformError::new(
            index,
            format!("transform panicked: {}", panic_message(payload.as_ref())),
        )),
    };

    tracing::trace!(
        index,
        transform = transform.name(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        ok = result.is_ok(),
        "transformed image"
    );

    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
