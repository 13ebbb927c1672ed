use crate::classifier_service::core::ClassificationState;

pub const IN_PROGRESS_MESSAGE: &str = "Classification in progress";
pub const FAILED_MESSAGE: &str = "Classification is failed";

pub fn render_lines(state: &ClassificationState) -> Vec<String> {
    match state {
        ClassificationState::Started => vec![IN_PROGRESS_MESSAGE.to_string()],
        ClassificationState::Failed => vec![FAILED_MESSAGE.to_string()],
        ClassificationState::Completed(results) => {
            results.iter().map(|result| result.to_string()).collect()
        }
    }
}
