use crate::classifier_service::core::ClassificationState;
use crate::classifier_service::main::{ClassifierService, StateReceiver};
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use crate::photo_library::interface::PhotoLibrary;
use crate::presentation::render::render_lines;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Camera,
    PhotoLibrary(PathBuf),
    Cancel,
}

/// Turns user actions into `classify` calls and renders whatever the
/// service reports. Must live on the thread that owns the display.
pub struct PresentationController {
    logger: Arc<dyn Logger + Send + Sync>,
    service: ClassifierService,
    receiver: StateReceiver,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    photo_library: Arc<dyn PhotoLibrary + Send + Sync>,
    device_display: Box<dyn DeviceDisplay>,
    state: Option<ClassificationState>,
}

impl PresentationController {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        service: ClassifierService,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        photo_library: Arc<dyn PhotoLibrary + Send + Sync>,
        device_display: Box<dyn DeviceDisplay>,
    ) -> Self {
        let receiver = service.subscribe();
        Self {
            logger: logger.with_namespace("presentation"),
            service,
            receiver,
            device_camera,
            photo_library,
            device_display,
            state: None,
        }
    }

    pub fn state(&self) -> Option<&ClassificationState> {
        self.state.as_ref()
    }

    /// Returns whether the action led to a classification.
    pub fn handle(&mut self, action: UserAction) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let image = match &action {
            UserAction::Cancel => None,
            UserAction::Camera => self.device_camera.capture_frame()?,
            UserAction::PhotoLibrary(path) => Some(self.photo_library.pick(path)?),
        };

        let Some(image) = image else {
            let _ = self.logger.info(&format!("{:?}: nothing to classify", action));
            return Ok(false);
        };

        self.service.classify(&image);
        self.pump()?;
        Ok(true)
    }

    /// Renders every state that is waiting. Returns how many there were.
    pub fn pump(&mut self) -> Result<usize, Box<dyn Error + Send + Sync>> {
        let states = self.receiver.drain();
        let count = states.len();
        for state in states {
            self.render(state)?;
        }
        Ok(count)
    }

    /// Blocks until the current call reaches a terminal state, rendering
    /// along the way.
    pub fn wait_for_terminal(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<ClassificationState>, Box<dyn Error + Send + Sync>> {
        self.pump()?;
        let deadline = Instant::now() + timeout;
        while !self.state.as_ref().is_some_and(ClassificationState::is_terminal) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Some(state) => self.render(state)?,
                None => return Ok(None),
            }
        }
        Ok(self.state.clone())
    }

    fn render(&mut self, state: ClassificationState) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.device_display.show(&render_lines(&state))?;
        self.state = Some(state);
        Ok(())
    }
}
