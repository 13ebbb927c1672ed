use crate::device_display::interface::DeviceDisplay;
use crate::presentation::controller::{PresentationController, UserAction};
use eframe::egui;
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Shares its text with the window; the window's update loop is the only
/// reader.
#[derive(Default)]
pub struct DeviceDisplayGui {
    lines: Arc<Mutex<Vec<String>>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Arc<Mutex<Vec<String>>> {
        self.lines.clone()
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn show(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.lines.lock().unwrap_or_else(PoisonError::into_inner) = lines.to_vec();
        Ok(())
    }
}

struct ClassifierWindow {
    controller: PresentationController,
    lines: Arc<Mutex<Vec<String>>>,
    choosing_source: bool,
    library_path: String,
    acquire_error: Option<String>,
}

impl ClassifierWindow {
    fn handle(&mut self, action: UserAction) {
        self.choosing_source = false;
        self.acquire_error = match self.controller.handle(action) {
            Ok(_) => None,
            Err(error) => Some(error.to_string()),
        };
    }
}

impl eframe::App for ClassifierWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(error) = self.controller.pump() {
            self.acquire_error = Some(error.to_string());
        }

        let lines = self
            .lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let mut action = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                if ui
                    .add_sized([100.0, 40.0], egui::Button::new("Add Image"))
                    .clicked()
                {
                    self.choosing_source = true;
                }

                if self.choosing_source {
                    ui.add_space(10.0);
                    ui.label("Choose Image");
                    if ui.button("Camera").clicked() {
                        action = Some(UserAction::Camera);
                    }
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut self.library_path);
                        if ui.button("Photo Library").clicked() && !self.library_path.is_empty() {
                            action = Some(UserAction::PhotoLibrary(PathBuf::from(
                                self.library_path.trim(),
                            )));
                        }
                    });
                    if ui.button("Cancel").clicked() {
                        action = Some(UserAction::Cancel);
                    }
                }

                ui.add_space(20.0);
                for line in &lines {
                    ui.label(egui::RichText::new(line).size(18.0));
                }

                if let Some(error) = &self.acquire_error {
                    ui.add_space(10.0);
                    ui.colored_label(egui::Color32::LIGHT_RED, error);
                }
            });
        });

        if let Some(action) = action {
            self.handle(action);
        }

        // results arrive from worker threads between frames
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// Runs the window on the current thread until it is closed.
pub fn run_window(
    controller: PresentationController,
    lines: Arc<Mutex<Vec<String>>>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([420.0, 360.0]),
        ..Default::default()
    };

    let window = ClassifierWindow {
        controller,
        lines,
        choosing_source: false,
        library_path: String::new(),
        acquire_error: None,
    };

    eframe::run_native(
        "Photo Classifier",
        options,
        Box::new(|_cc| Box::new(window)),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_replaces_shared_lines() {
        let mut display = DeviceDisplayGui::new();
        let lines = display.lines();

        display.show(&["one".to_string(), "two".to_string()]).unwrap();
        display.show(&["three".to_string()]).unwrap();

        assert_eq!(*lines.lock().unwrap(), vec!["three".to_string()]);
    }

    #[test]
    fn test_starts_blank() {
        let display = DeviceDisplayGui::default();

        assert!(display.lines().lock().unwrap().is_empty());
    }
}
