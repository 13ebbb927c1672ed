use image::{imageops, DynamicImage};

/// RGB pixels normalised to [0, 1], laid out NCHW with a batch of one.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl PixelBuffer {
    pub fn from_image(
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if image.width() == 0 || image.height() == 0 {
            return Err(format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            )
            .into());
        }
        if width == 0 || height == 0 {
            return Err(format!("invalid engine input size {}x{}", width, height).into());
        }

        let resized = resize_image(image, width, height);
        let data = image_to_nchw(&resized);

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn shape(&self) -> [usize; 4] {
        [1, 3, self.height as usize, self.width as usize]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mean over every channel value.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }
}

/// Resizes to the target size, letterboxing with black when the aspect
/// ratios differ.
pub fn resize_image(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let same_aspect = image.width() as u64 * height as u64 == image.height() as u64 * width as u64;
    if same_aspect {
        return image.resize_exact(width, height, imageops::FilterType::Triangle);
    }

    let (w, h) = (image.width() as f32, image.height() as f32);
    let scale = (width as f32 / w).min(height as f32 / h);
    let new_w = ((w * scale) as u32).clamp(1, width);
    let new_h = ((h * scale) as u32).clamp(1, height);

    let scaled = image
        .resize_exact(new_w, new_h, imageops::FilterType::Triangle)
        .to_rgb8();
    let mut padded = DynamicImage::new_rgb8(width, height).to_rgb8();

    let x_offset = (width - new_w) / 2;
    let y_offset = (height - new_h) / 2;
    imageops::replace(&mut padded, &scaled, x_offset as i64, y_offset as i64);

    DynamicImage::from(padded)
}

fn image_to_nchw(image: &DynamicImage) -> Vec<f32> {
    let rgb = image.to_rgb8();
    let plane = (rgb.width() * rgb.height()) as usize;
    let mut data = vec![0f32; 3 * plane];

    for (i, pixel) in rgb.pixels().enumerate() {
        for c in 0..3 {
            data[c * plane + i] = pixel[c] as f32 / 255.0;
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        let mut img = ImageBuffer::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(color);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_square_image_channels() {
        let buffer = PixelBuffer::from_image(&solid(100, 100, [255, 0, 0]), 64, 64).unwrap();

        assert_eq!(buffer.shape(), [1, 3, 64, 64]);
        let slice = buffer.data();
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[64 * 64], 0.0);
        assert_eq!(slice[2 * 64 * 64], 0.0);
    }

    #[test]
    fn test_rectangle_is_centered_with_padding() {
        let buffer = PixelBuffer::from_image(&solid(200, 100, [255, 0, 0]), 64, 64).unwrap();

        let slice = buffer.data();
        let center = 32 * 64 + 32;
        assert_eq!(slice[center], 1.0);
        // top row is letterbox padding
        assert_eq!(slice[0], 0.0);
    }

    #[test]
    fn test_normalization() {
        let buffer = PixelBuffer::from_image(&solid(10, 10, [128, 128, 128]), 8, 8).unwrap();

        let expected = 128.0 / 255.0;
        assert!(buffer.data().iter().all(|v| (v - expected).abs() < 0.0001));
        assert!((buffer.mean() - expected).abs() < 0.0001);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let image = DynamicImage::new_rgb8(0, 0);

        assert!(PixelBuffer::from_image(&image, 8, 8).is_err());
    }

    #[test]
    fn test_zero_input_size_is_rejected() {
        assert!(PixelBuffer::from_image(&solid(4, 4, [0, 0, 0]), 0, 8).is_err());
    }
}
