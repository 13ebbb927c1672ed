use crate::image_classifier::model_config::ModelConfig;
use chrono::Offset;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EngineKind {
    /// Random labels, no model needed.
    Fake,
    TractOnnx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum UiKind {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    pub engine: EngineKind,
    pub model: ModelConfig,
    pub cache_engine: bool,
    pub fake_engine_delay: Duration,
    pub ui: UiKind,
    pub result_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: mountain_standard_time(),
            engine: EngineKind::Fake,
            model: ModelConfig::default(),
            cache_engine: false,
            fake_engine_delay: Duration::from_millis(500),
            ui: UiKind::Console,
            result_timeout: Duration::from_secs(30),
        }
    }
}

fn mountain_standard_time() -> chrono::FixedOffset {
    chrono::FixedOffset::west_opt(7 * 3600).unwrap_or_else(|| chrono::Utc.fix())
}
