use crate::config::{Config, EngineKind, UiKind};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "photo-classifier")]
#[command(about = "Pick or capture a photo and show the top labels of an image classifier")]
pub struct Args {
    /// Classification engine backing the service.
    #[arg(long, value_enum)]
    pub engine: Option<EngineKind>,

    /// Path to an ONNX classification model.
    #[arg(long)]
    pub model: Option<String>,

    /// Labels file, one label per line.
    #[arg(long)]
    pub labels: Option<String>,

    /// Model input size in pixels (square).
    #[arg(long)]
    pub input_size: Option<u32>,

    /// Treat model output as probabilities instead of logits.
    #[arg(long)]
    pub no_softmax: bool,

    #[arg(long)]
    pub top_k: Option<usize>,

    /// Load the engine once and share it across calls.
    #[arg(long)]
    pub cache_engine: bool,

    /// Simulated inference latency of the fake engine, in milliseconds.
    #[arg(long)]
    pub fake_delay_ms: Option<u64>,

    #[arg(long, value_enum)]
    pub ui: Option<UiKind>,
}

impl Args {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(engine) = self.engine {
            config.engine = engine;
        }
        if let Some(model) = self.model {
            config.model.onnx_model_path = model;
        }
        if let Some(labels) = self.labels {
            config.model.labels_path = Some(labels);
        }
        if let Some(size) = self.input_size {
            config.model.input_shape = (size, size);
        }
        if self.no_softmax {
            config.model.apply_softmax = false;
        }
        if let Some(top_k) = self.top_k {
            config.model.top_k = top_k;
        }
        if self.cache_engine {
            config.cache_engine = true;
        }
        if let Some(delay) = self.fake_delay_ms {
            config.fake_engine_delay = Duration::from_millis(delay);
        }
        if let Some(ui) = self.ui {
            config.ui = ui;
        }
        config
    }
}
