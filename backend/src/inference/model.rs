use std::sync::Arc;

use shared::ClassifierKind;

use super::preprocess::{Normalization, PixelTensor};
use crate::config::ClassifierConfig;

/// Number of classes in the ImageNet label set the classifiers predict over.
pub const IMAGENET_CLASS_COUNT: usize = 1000;

/// Per-class probabilities for a single image.
pub type PredictionVector = Vec<f32>;

#[allow(dead_code)]
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Model error: {0}")]
    Model(String),
}

/// An image classifier shared read-only by every request handler.
pub trait Classifier: Send + Sync {
    fn kind(&self) -> ClassifierKind;

    /// Input mapping this classifier was trained with.
    fn normalization(&self) -> Normalization;

    fn predict(&self, batch: &PixelTensor) -> Result<PredictionVector, InferenceError>;

    /// Human readable class names indexed like the prediction vector, or
    /// `None` when the classifier cannot name its outputs.
    fn labels(&self) -> Option<&[&str]>;
}

/// Stands in for the real model when it cannot be loaded. Keeps the response
/// shape intact without producing a meaningful prediction.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubClassifier;

impl Classifier for StubClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Stub
    }

    fn normalization(&self) -> Normalization {
        Normalization::UnitRange
    }

    fn predict(&self, _batch: &PixelTensor) -> Result<PredictionVector, InferenceError> {
        Ok(vec![0.0; IMAGENET_CLASS_COUNT])
    }

    fn labels(&self) -> Option<&[&str]> {
        None
    }
}

/// Builds the classifier for the lifetime of the process. Any failure to load
/// the real model installs the stub instead; it is never retried.
pub fn load_classifier(config: &ClassifierConfig) -> Arc<dyn Classifier> {
    match load_pretrained(config) {
        Ok(classifier) => {
            log::info!(
                "Loaded {} from {}",
                classifier.kind(),
                config.model_path.display()
            );
            classifier
        }
        Err(e) => {
            log::warn!("Falling back to stub classifier: {}", e);
            Arc::new(StubClassifier)
        }
    }
}

#[cfg(feature = "torch")]
fn load_pretrained(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>, InferenceError> {
    let classifier = super::torch::TorchClassifier::load(config)?;
    Ok(Arc::new(classifier))
}

#[cfg(not(feature = "torch"))]
fn load_pretrained(_config: &ClassifierConfig) -> Result<Arc<dyn Classifier>, InferenceError> {
    Err(InferenceError::ModelUnavailable(
        "built without the `torch` feature".to_string(),
    ))
}
