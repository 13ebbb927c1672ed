#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: String,
    /// One label per line, indexed by class id.
    pub labels_path: Option<String>,
    /// (width, height) the model expects.
    pub input_shape: (u32, u32),
    /// Set for models that emit raw logits instead of probabilities.
    pub apply_softmax: bool,
    pub top_k: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            onnx_model_path: "./models/mobilenetv2-7.onnx".to_string(),
            labels_path: Some("./models/imagenet_labels.txt".to_string()),
            input_shape: (224, 224),
            apply_softmax: true,
            top_k: 5,
        }
    }
}
