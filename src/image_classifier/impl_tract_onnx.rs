use crate::image_classifier::interface::{Classification, ImageClassifier, InferenceOutput};
use crate::image_classifier::model_config::ModelConfig;
use crate::image_classifier::pixel_buffer::PixelBuffer;
use crate::library::logger::interface::Logger;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct ImageClassifierTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    config: ModelConfig,
    labels: Vec<String>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let logger = logger
            .with_namespace("image_classifier")
            .with_namespace("tract_onnx");
        let _ = logger.info(&format!("Loading model {}", config.onnx_model_path));

        let (width, height) = config.input_shape;
        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)?
            .with_input_fact(0, f32::fact([1, 3, height as usize, width as usize]).into())?
            .into_optimized()?
            .into_runnable()?;

        let labels = match &config.labels_path {
            Some(path) => parse_labels(&std::fs::read_to_string(path)?),
            None => Vec::new(),
        };

        let _ = logger.info(&format!("Model loaded with {} labels", labels.len()));

        Ok(Self {
            model,
            config,
            labels,
            logger,
        })
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn input_size(&self) -> (u32, u32) {
        self.config.input_shape
    }

    fn infer(
        &self,
        buffer: &PixelBuffer,
    ) -> Result<InferenceOutput, Box<dyn std::error::Error + Send + Sync>> {
        let [n, c, h, w] = buffer.shape();
        let input = tract_ndarray::Array4::from_shape_vec((n, c, h, w), buffer.data().to_vec())?
            .into_tensor();

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let Some(output) = outputs.first() else {
            return Ok(InferenceOutput::Unrecognized {
                kind: "no output tensor".to_string(),
            });
        };

        let scores = match scores_from_output(output) {
            Ok(scores) => scores,
            Err(unrecognized) => {
                let _ = self
                    .logger
                    .info(&format!("Unexpected output {:?}", unrecognized));
                return Ok(unrecognized);
            }
        };

        Ok(InferenceOutput::Classifications(rank_scores(
            &scores,
            self.config.apply_softmax,
            self.config.top_k,
            &self.labels,
        )))
    }
}

/// Reads class scores from a `[N]` or `[1, N]` f32 tensor.
pub fn scores_from_output(output: &Tensor) -> Result<Vec<f32>, InferenceOutput> {
    let view = output
        .to_array_view::<f32>()
        .map_err(|_| InferenceOutput::Unrecognized {
            kind: format!("{:?} tensor", output.datum_type()),
        })?;

    match view.shape() {
        [_] | [1, _] => Ok(view.iter().copied().collect()),
        shape => Err(InferenceOutput::Unrecognized {
            kind: format!("tensor of shape {:?}", shape),
        }),
    }
}

pub fn parse_labels(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; scores.len()];
    }
    exps.iter().map(|e| e / sum).collect()
}

/// Turns a score per class into classifications ranked highest first.
pub fn rank_scores(
    scores: &[f32],
    apply_softmax: bool,
    top_k: usize,
    labels: &[String],
) -> Vec<Classification> {
    let probabilities = if apply_softmax {
        softmax(scores)
    } else {
        scores.to_vec()
    };

    let mut ranked: Vec<(usize, f32)> = probabilities.into_iter().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(top_k);

    ranked
        .into_iter()
        .map(|(class_idx, confidence)| Classification {
            label: labels
                .get(class_idx)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", class_idx)),
            confidence,
        })
        .collect()
}
