use std::error::Error;

/// Where the classification text ends up.
pub trait DeviceDisplay: Send {
    /// Replaces everything on screen with `lines`. An empty slice blanks
    /// the display.
    fn show(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>>;
}
