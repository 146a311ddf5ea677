use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageError, ImageReader, Limits, RgbImage};

use super::model::InferenceError;

/// Side length of the square input the classifier is trained on.
pub const INPUT_SIZE: u32 = 224;

/// Largest width or height accepted before decoding.
pub const MAX_DIMENSION: u32 = 4096;
const MAX_DECODE_ALLOC: u64 = 128 * 1024 * 1024;

fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DIMENSION);
    limits.max_image_height = Some(MAX_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);
    limits
}

/// Decodes an uploaded image of any supported format into a 224x224 RGB image.
/// Images larger than `MAX_DIMENSION` on either side are rejected from their
/// header, before any pixel buffer is allocated.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, InferenceError> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ImageError::IoError)?;
    reader.limits(decode_limits());
    let image = reader.decode()?;
    Ok(imageops::resize(
        &image.to_rgb8(),
        INPUT_SIZE,
        INPUT_SIZE,
        FilterType::CatmullRom,
    ))
}
