use crate::image_classifier::pixel_buffer::PixelBuffer;
use std::sync::Arc;

/// One raw observation from an engine: a label and a probability in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: &str, confidence: f32) -> Self {
        Self {
            label: label.to_string(),
            confidence,
        }
    }
}

/// What an engine handed back for one inference. Engines that produce
/// something other than ranked classifications (detections, embeddings,
/// oddly shaped tensors) report it as `Unrecognized`.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutput {
    Classifications(Vec<Classification>),
    Unrecognized { kind: String },
}

pub trait ImageClassifier: Send + Sync {
    /// (width, height) of the pixel buffer `infer` expects.
    fn input_size(&self) -> (u32, u32);

    /// Runs one inference. Classifications come back in the engine's own
    /// ranking order.
    fn infer(
        &self,
        buffer: &PixelBuffer,
    ) -> Result<InferenceOutput, Box<dyn std::error::Error + Send + Sync>>;
}

/// Produces engine handles for the classifier service.
pub trait ImageClassifierLoader: Send + Sync {
    fn load(
        &self,
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>;
}
