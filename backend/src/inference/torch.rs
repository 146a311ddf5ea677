use std::sync::Mutex;

use shared::ClassifierKind;
use tch::vision::imagenet;
use tch::{CModule, Device, Kind, Tensor};

use super::model::{Classifier, InferenceError, PredictionVector};
use super::preprocess::{Normalization, PixelTensor};
use crate::config::ClassifierConfig;

/// MobileNetV2 exported to TorchScript with ImageNet weights.
pub struct TorchClassifier {
    module: Mutex<CModule>,
    device: Device,
}

impl TorchClassifier {
    pub fn load(config: &ClassifierConfig) -> Result<Self, InferenceError> {
        let path = &config.model_path;
        if !path.is_file() {
            return Err(InferenceError::ModelUnavailable(format!(
                "no weights at {}",
                path.display()
            )));
        }

        let device = if config.use_cuda {
            Device::cuda_if_available()
        } else {
            Device::Cpu
        };
        let mut module = CModule::load_on_device(path, device)
            .map_err(|e| InferenceError::ModelUnavailable(e.to_string()))?;
        module.set_eval();
        log::info!("MobileNetV2 running on {:?}", device);

        Ok(Self {
            module: Mutex::new(module),
            device,
        })
    }
}

impl Classifier for TorchClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::MobileNetV2
    }

    fn normalization(&self) -> Normalization {
        Normalization::ImageNet
    }

    fn predict(&self, batch: &PixelTensor) -> Result<PredictionVector, InferenceError> {
        let (n, h, w, c) = batch.dim();
        let data: Vec<f32> = batch.iter().copied().collect();
        // NHWC -> NCHW
        let input = Tensor::from_slice(&data)
            .view([n as i64, h as i64, w as i64, c as i64])
            .permute([0, 3, 1, 2])
            .to_device(self.device);

        let module = self
            .module
            .lock()
            .map_err(|_| InferenceError::Model("model lock poisoned".to_string()))?;
        let logits = tch::no_grad(|| module.forward_ts(&[input]))
            .map_err(|e| InferenceError::Model(e.to_string()))?;

        let probabilities = logits
            .softmax(-1, Kind::Float)
            .view([-1])
            .to_device(Device::Cpu);
        Vec::<f32>::try_from(&probabilities).map_err(|e| InferenceError::Model(e.to_string()))
    }

    fn labels(&self) -> Option<&[&str]> {
        let classes: &'static [&'static str] = &imagenet::CLASSES;
        Some(classes)
    }
}
