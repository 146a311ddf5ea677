pub mod compose;
pub mod decode;
pub mod model;
pub mod preprocess;
#[cfg(feature = "torch")]
pub mod torch;

use rand::Rng;
use shared::HealthReport;

pub use model::{Classifier, InferenceError, load_classifier};

/// Decode, normalize, classify and score one uploaded image.
pub fn analyze<R: Rng + ?Sized>(
    classifier: &dyn Classifier,
    image_bytes: &[u8],
    rng: &mut R,
) -> Result<HealthReport, InferenceError> {
    let image = decode::decode_image(image_bytes)?;
    let batch = preprocess::to_batch(&image, classifier.normalization());
    let predictions = classifier.predict(&batch)?;
    Ok(compose::compose(&predictions, classifier.labels(), rng))
}
