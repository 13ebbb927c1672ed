use crate::device_camera::interface::DeviceCamera;
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageBuffer, Rgb};
use std::sync::Arc;

/// Synthesises a random gradient instead of talking to real hardware.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    width: u32,
    height: u32,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            width: 320,
            height: 240,
        }
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn capture_frame(
        &self,
    ) -> Result<Option<DynamicImage>, Box<dyn std::error::Error + Send + Sync>> {
        let _ = self.logger.info("Capturing frame...");

        let tint: [u8; 3] = rand::random();
        let (width, height) = (self.width, self.height);
        let frame = ImageBuffer::from_fn(width, height, |x, y| {
            let shade = ((x + y) * 255 / (width + height)) as u8;
            Rgb([
                tint[0].wrapping_add(shade),
                tint[1].wrapping_add(shade / 2),
                tint[2],
            ])
        });

        let _ = self
            .logger
            .info(&format!("Frame captured ({}x{})", width, height));
        Ok(Some(DynamicImage::ImageRgb8(frame)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    struct LoggerBroken;

    impl Logger for LoggerBroken {
        fn info(&self, _message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("log sink closed".into())
        }

        fn with_namespace(&self, _namespace: &str) -> Arc<dyn Logger + Send + Sync> {
            Arc::new(LoggerBroken)
        }
    }

    #[test]
    fn test_capture_frame() {
        let logger = LoggerFake::new();
        let camera = DeviceCameraFake::new(Arc::new(logger.clone()));

        let frame = camera.capture_frame().unwrap().unwrap();

        assert_eq!((frame.width(), frame.height()), (320, 240));
        assert!(logger.contains("camera:fake: Frame captured"));
    }

    #[test]
    fn test_capture_survives_logging_failure() {
        let camera = DeviceCameraFake::new(Arc::new(LoggerBroken));

        let frame = camera.capture_frame().unwrap();

        assert!(frame.is_some());
    }
}
