use clap::Parser;
use classifier_service::main::ClassifierService;
use config::{Config, UiKind};
use device_camera::impl_fake::DeviceCameraFake;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::{run_window, DeviceDisplayGui};
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use photo_library::impl_file::PhotoLibraryFile;
use presentation::controller::PresentationController;
use std::sync::Arc;

mod classifier_service;
mod cli;
mod config;
mod device_camera;
mod device_display;
mod image_classifier;
mod library;
mod photo_library;
mod presentation;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = cli::Args::parse().apply(Config::default());

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));
    logger.info(&format!(
        "Starting with {:?} engine, {:?} ui",
        config.engine, config.ui
    ))?;

    let loader = image_classifier::loader::from_config(&config, logger.clone());
    let service = ClassifierService::new(loader, logger.clone());
    let device_camera = Arc::new(DeviceCameraFake::new(logger.clone()));
    let photo_library = Arc::new(PhotoLibraryFile::new(logger.clone()));

    match config.ui {
        UiKind::Console => {
            let device_display = Box::new(DeviceDisplayConsole::new());
            let mut controller = PresentationController::new(
                logger.clone(),
                service,
                device_camera,
                photo_library,
                device_display,
            );
            presentation::console::run(
                &mut controller,
                std::io::stdin().lock(),
                logger,
                config.result_timeout,
            )?;
        }
        UiKind::Gui => {
            let device_display = DeviceDisplayGui::new();
            let lines = device_display.lines();
            let controller = PresentationController::new(
                logger,
                service,
                device_camera,
                photo_library,
                Box::new(device_display),
            );
            run_window(controller, lines)?;
        }
    }

    Ok(())
}
