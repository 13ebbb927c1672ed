use crate::image_classifier::interface::{Classification, ImageClassifier, InferenceOutput};
use crate::image_classifier::pixel_buffer::PixelBuffer;
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use rand::seq::IndexedRandom;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const OBJECTS: [&str; 18] = [
    "dog", "cat", "person", "car", "chair", "table", "bird", "tree", "bicycle", "book", "laptop",
    "phone", "cup", "bottle", "keyboard", "mouse", "plant", "clock",
];

#[derive(Debug, Clone)]
enum Behavior {
    Random,
    #[cfg_attr(not(test), allow(dead_code))]
    Scripted(Result<InferenceOutput, String>),
}

pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    behavior: Behavior,
    delay: Duration,
    input_size: (u32, u32),
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    /// A handful of random labels, ranked highest confidence first.
    pub fn random(logger: Arc<dyn Logger + Send + Sync>, delay: Duration) -> Self {
        Self::with_behavior(logger, Behavior::Random, delay)
    }

    #[cfg(test)]
    pub fn scripted(
        logger: Arc<dyn Logger + Send + Sync>,
        output: Result<InferenceOutput, String>,
        delay: Duration,
    ) -> Self {
        Self::with_behavior(logger, Behavior::Scripted(output), delay)
    }

    fn with_behavior(
        logger: Arc<dyn Logger + Send + Sync>,
        behavior: Behavior,
        delay: Duration,
    ) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            behavior,
            delay,
            input_size: (32, 32),
            calls: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_classifications(
        &self,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let mut rng = rand::rng();
        let count = Uniform::new_inclusive(1, 4)?.sample(&mut rng);
        let confidence_dist = Uniform::new(0.0f32, 1.0)?;

        let mut classifications: Vec<Classification> = OBJECTS
            .choose_multiple(&mut rng, count)
            .map(|label| Classification::new(label, confidence_dist.sample(&mut rng)))
            .collect();

        // Split the unit interval so the confidences read like probabilities.
        let total: f32 = classifications.iter().map(|c| c.confidence).sum();
        if total > 0.0 {
            for classification in classifications.iter_mut() {
                classification.confidence /= total;
            }
        }
        classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        Ok(classifications)
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    fn infer(
        &self,
        buffer: &PixelBuffer,
    ) -> Result<InferenceOutput, Box<dyn std::error::Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!(
            "Classifying {}x{} buffer (mean {:.3})...",
            buffer.width(),
            buffer.height(),
            buffer.mean()
        ));

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let output = match &self.behavior {
            Behavior::Random => InferenceOutput::Classifications(self.random_classifications()?),
            Behavior::Scripted(Ok(output)) => output.clone(),
            Behavior::Scripted(Err(message)) => return Err(message.clone().into()),
        };

        let _ = self.logger.info(&format!("Classified: {:?}", output));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::DynamicImage;

    fn buffer() -> PixelBuffer {
        PixelBuffer::from_image(&DynamicImage::new_rgb8(4, 4), 4, 4).unwrap()
    }

    #[test]
    fn test_random_is_ranked_and_bounded() {
        let classifier = ImageClassifierFake::random(Arc::new(LoggerFake::new()), Duration::ZERO);

        for _ in 0..20 {
            let output = classifier.infer(&buffer()).unwrap();
            let InferenceOutput::Classifications(classifications) = output else {
                panic!("expected classifications");
            };
            assert!(!classifications.is_empty());
            assert!(classifications
                .iter()
                .all(|c| (0.0..=1.0).contains(&c.confidence)));
            assert!(classifications
                .windows(2)
                .all(|pair| pair[0].confidence >= pair[1].confidence));
        }
        assert_eq!(classifier.calls(), 20);
    }

    #[test]
    fn test_scripted_error() {
        let classifier = ImageClassifierFake::scripted(
            Arc::new(LoggerFake::new()),
            Err("model crashed".to_string()),
            Duration::ZERO,
        );

        let error = classifier.infer(&buffer()).unwrap_err();

        assert_eq!(error.to_string(), "model crashed");
        assert_eq!(classifier.calls(), 1);
    }

    #[test]
    fn test_scripted_output_is_returned_verbatim() {
        let output = InferenceOutput::Classifications(vec![
            Classification::new("cat", 0.2),
            Classification::new("dog", 0.7),
        ]);
        let classifier = ImageClassifierFake::scripted(
            Arc::new(LoggerFake::new()),
            Ok(output.clone()),
            Duration::ZERO,
        );

        assert_eq!(classifier.infer(&buffer()).unwrap(), output);
    }
}
