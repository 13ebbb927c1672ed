use image::DynamicImage;

pub trait DeviceCamera: Send + Sync {
    /// Captures one still. `Ok(None)` means the user backed out.
    fn capture_frame(
        &self,
    ) -> Result<Option<DynamicImage>, Box<dyn std::error::Error + Send + Sync>>;
}
