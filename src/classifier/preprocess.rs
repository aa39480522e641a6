use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

use super::error::ClassifierError;

/// Model input edge length in pixels.
pub const INPUT_SIZE: u32 = 224;

/// Converts an encoded image of any size or mode into the
/// `(1, 224, 224, 3)` tensor the model expects, with pixel values scaled
/// to `[0, 1]`.
///
/// Steps, in order: decode; flatten any alpha channel by converting to
/// RGB; stretch-resize to exactly 224x224 (aspect ratio is NOT
/// preserved; the trained model expects the stretch, so do not swap in a
/// crop); scale u8 pixels by 1/255; prepend the batch dimension.
pub fn preprocess_image(bytes: &[u8]) -> Result<Array4<f32>, ClassifierError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ClassifierError::Image(format!("failed to decode image: {}", e)))?;
    Ok(tensor_from_image(&decoded))
}

/// Tensor conversion for an already-decoded image. Infallible: every
/// decoded image has a well-defined RGB rendition.
pub fn tensor_from_image(decoded: &DynamicImage) -> Array4<f32> {
    let rgb: RgbImage = decoded.to_rgb8();
    let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let mut tensor = Array4::<f32>::zeros((1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for channel in 0..3 {
            tensor[[0, y as usize, x as usize, channel]] = pixel[channel] as f32 / 255.0;
        }
    }

    tensor
}
