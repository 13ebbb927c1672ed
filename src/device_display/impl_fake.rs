use crate::device_display::interface::DeviceDisplay;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Keeps every frame that was shown.
#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    frames: Arc<Mutex<Vec<Vec<String>>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Vec<String>> {
        self.frames.lock().unwrap().clone()
    }

    pub fn last_frame(&self) -> Option<Vec<String>> {
        self.frames().last().cloned()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.frames.lock().unwrap().push(lines.to_vec());
        Ok(())
    }
}
