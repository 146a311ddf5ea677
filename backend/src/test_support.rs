use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use shared::ClassifierKind;

use crate::inference::model::{Classifier, InferenceError, PredictionVector};
use crate::inference::preprocess::{Normalization, PixelTensor};

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    encode(&image, ImageFormat::Png)
}

static ANIMALS: [&str; 4] = ["cat", "dog", "fish", "bird"];

/// Fixed-output classifier with a label table.
pub struct LabelledClassifier;

impl Classifier for LabelledClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::MobileNetV2
    }

    fn normalization(&self) -> Normalization {
        Normalization::ImageNet
    }

    fn predict(&self, batch: &PixelTensor) -> Result<PredictionVector, InferenceError> {
        assert_eq!(batch.dim(), (1, 224, 224, 3));
        Ok(vec![0.1, 0.6, 0.05, 0.25])
    }

    fn labels(&self) -> Option<&[&str]> {
        Some(ANIMALS.as_slice())
    }
}

pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::MobileNetV2
    }

    fn normalization(&self) -> Normalization {
        Normalization::ImageNet
    }

    fn predict(&self, _batch: &PixelTensor) -> Result<PredictionVector, InferenceError> {
        Err(InferenceError::Model("backend crashed".to_string()))
    }

    fn labels(&self) -> Option<&[&str]> {
        None
    }
}
