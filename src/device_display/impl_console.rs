use crate::device_display::interface::DeviceDisplay;
use std::error::Error;
use std::io::Write;

pub struct DeviceDisplayConsole<W: Write + Send> {
    out: W,
}

impl DeviceDisplayConsole<std::io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for DeviceDisplayConsole<std::io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> DeviceDisplayConsole<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write + Send> DeviceDisplay for DeviceDisplayConsole<W> {
    fn show(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(16);

        writeln!(self.out, "┌{}┐", "─".repeat(width))?;
        for line in lines {
            let padding = width - line.chars().count();
            writeln!(self.out, "│{}{}│", line, " ".repeat(padding))?;
        }
        writeln!(self.out, "└{}┘", "─".repeat(width))?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier_service::core::{ClassificationResult, ClassificationState};
    use crate::presentation::render::render_lines;

    fn rendered(display: &DeviceDisplayConsole<Vec<u8>>) -> String {
        String::from_utf8(display.writer().clone()).unwrap()
    }

    #[test]
    fn test_boxes_lines() {
        let mut display = DeviceDisplayConsole::with_writer(Vec::new());

        display.show(&["Classification in progress".to_string()]).unwrap();

        let border = "─".repeat(26);
        assert_eq!(
            rendered(&display),
            format!("┌{0}┐\n│Classification in progress│\n└{0}┘\n", border)
        );
    }

    #[test]
    fn test_shows_every_result_line() {
        let mut display = DeviceDisplayConsole::with_writer(Vec::new());
        let results = (1..=7)
            .map(|n| ClassificationResult {
                label: format!("label_{}", n),
                confidence_percent: 10 + n,
            })
            .collect();

        display
            .show(&render_lines(&ClassificationState::Completed(results)))
            .unwrap();

        let out = rendered(&display);
        assert_eq!(out.lines().filter(|l| l.contains("This is")).count(), 7);
        assert!(out.contains("│This is label_7 with 17% confidence"));
    }

    #[test]
    fn test_blank_display() {
        let mut display = DeviceDisplayConsole::with_writer(Vec::new());

        display.show(&[]).unwrap();

        assert_eq!(rendered(&display).lines().count(), 2);
    }
}
