use crate::image_classifier::interface::Classification;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub label: String,
    /// Always in 1..=100.
    pub confidence_percent: u8,
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "This is {} with {}% confidence",
            self.label, self.confidence_percent
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationState {
    Started,
    Failed,
    Completed(Vec<ClassificationResult>),
}

impl ClassificationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ClassificationState::Started)
    }
}

/// Why a classification ended in `Failed`. Only ever logged; observers see
/// the bare `Failed` state.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classification engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("unrecognized engine output: {0}")]
    UnrecognizedOutput(String),
    #[error("could not start inference worker: {0}")]
    Worker(String),
}

impl ClassifyError {
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            ClassifyError::EngineUnavailable(_)
                | ClassifyError::UnsupportedImage(_)
                | ClassifyError::Worker(_)
        )
    }
}

/// Scales a probability to a whole percentage, rounding half away from
/// zero. Anything that rounds to 0% (or is not a number) is dropped.
pub fn to_result(classification: &Classification) -> Option<ClassificationResult> {
    let percent = (classification.confidence * 100.0).round();
    if percent.is_nan() || percent < 1.0 {
        return None;
    }
    Some(ClassificationResult {
        label: classification.label.clone(),
        confidence_percent: percent.min(100.0) as u8,
    })
}

/// Keeps the engine's ordering; nothing is re-sorted.
pub fn to_results(classifications: &[Classification]) -> Vec<ClassificationResult> {
    classifications.iter().filter_map(to_result).collect()
}
