use image::RgbImage;
use ndarray::Array4;

/// Batch of one NHWC image, shape `(1, height, width, 3)`.
pub type PixelTensor = Array4<f32>;

// torchvision ImageNet statistics, per RGB channel.
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// How raw `u8` channel values are mapped before they reach a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Scale to [0, 1], then standardize with the ImageNet mean and std.
    ImageNet,
    /// Scale to [0, 1].
    UnitRange,
}

impl Normalization {
    fn apply(self, channel: usize, value: u8) -> f32 {
        let scaled = f32::from(value) / 255.0;
        match self {
            Normalization::ImageNet => (scaled - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel],
            Normalization::UnitRange => scaled,
        }
    }
}

pub fn to_batch(image: &RgbImage, normalization: Normalization) -> PixelTensor {
    let (width, height) = image.dimensions();
    Array4::from_shape_fn(
        (1, height as usize, width as usize, 3),
        |(_, y, x, c)| normalization.apply(c, image.get_pixel(x as u32, y as u32)[c]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(224, 224, Rgb(rgb))
    }

    #[test]
    fn batch_is_nhwc_with_single_item() {
        let batch = to_batch(&solid([0, 0, 0]), Normalization::UnitRange);
        assert_eq!(batch.dim(), (1, 224, 224, 3));
    }

    #[test]
    fn unit_range_divides_by_255() {
        let batch = to_batch(&solid([255, 0, 51]), Normalization::UnitRange);
        assert_eq!(batch[[0, 5, 7, 0]], 1.0);
        assert_eq!(batch[[0, 5, 7, 1]], 0.0);
        assert!((batch[[0, 5, 7, 2]] - 0.2).abs() < 1e-6);
        assert!(batch.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn imagenet_standardizes_each_channel() {
        let batch = to_batch(&solid([255, 255, 255]), Normalization::ImageNet);
        for c in 0..3 {
            let expected = (1.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
            assert!((batch[[0, 0, 0, c]] - expected).abs() < 1e-5);
        }

        let black = to_batch(&solid([0, 0, 0]), Normalization::ImageNet);
        assert!((black[[0, 100, 100, 0]] + 0.485 / 0.229).abs() < 1e-5);
    }

    #[test]
    fn pixel_positions_map_to_height_then_width() {
        let mut image = solid([0, 0, 0]);
        image.put_pixel(10, 3, Rgb([255, 255, 255]));
        let batch = to_batch(&image, Normalization::UnitRange);
        assert_eq!(batch[[0, 3, 10, 0]], 1.0);
        assert_eq!(batch[[0, 10, 3, 0]], 0.0);
    }
}
