use crate::library::logger::interface::Logger;
use crate::photo_library::interface::PhotoLibrary;
use image::{DynamicImage, ImageReader};
use std::path::Path;
use std::sync::Arc;

pub struct PhotoLibraryFile {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl PhotoLibraryFile {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("photo_library"),
        }
    }
}

impl PhotoLibrary for PhotoLibraryFile {
    fn pick(&self, path: &Path) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!("Opening {}", path.display()))?;
        let image = ImageReader::open(path)
            .map_err(|e| format!("Failed to open image {}: {}", path.display(), e))?
            .with_guessed_format()
            .map_err(|e| format!("Failed to read image {}: {}", path.display(), e))?
            .decode()
            .map_err(|e| format!("Failed to decode image {}: {}", path.display(), e))?;
        Ok(image)
    }
}
