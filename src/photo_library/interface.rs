use image::DynamicImage;
use std::path::Path;

pub trait PhotoLibrary: Send + Sync {
    fn pick(&self, path: &Path) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>>;
}
