use crate::classifier_service::main::{ClassifierService, StateReceiver};
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::image_classifier::interface::{
    Classification, ImageClassifier, ImageClassifierLoader, InferenceOutput,
};
use crate::image_classifier::loader::LoaderFresh;
use crate::image_classifier::pixel_buffer::PixelBuffer;
use crate::library::logger::impl_fake::LoggerFake;
use image::{DynamicImage, ImageBuffer, Rgb};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;
use std::time::Duration;

pub struct LoaderFailing {
    pub reason: String,
}

impl ImageClassifierLoader for LoaderFailing {
    fn load(
        &self,
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>
    {
        Err(self.reason.clone().into())
    }
}

/// Answers "dark" slowly and "bright" quickly, based on the image itself,
/// so overlapping calls finish in a known order whatever the scheduling.
pub struct ImageClassifierByBrightness {
    pub dark_delay: Duration,
    pub threads: Mutex<Vec<ThreadId>>,
}

impl ImageClassifier for ImageClassifierByBrightness {
    fn input_size(&self) -> (u32, u32) {
        (8, 8)
    }

    fn infer(
        &self,
        buffer: &PixelBuffer,
    ) -> Result<InferenceOutput, Box<dyn std::error::Error + Send + Sync>> {
        self.threads
            .lock()
            .unwrap()
            .push(std::thread::current().id());

        if buffer.mean() < 0.5 {
            std::thread::sleep(self.dark_delay);
            Ok(InferenceOutput::Classifications(vec![
                Classification::new("dark", 0.8),
            ]))
        } else {
            Ok(InferenceOutput::Classifications(vec![
                Classification::new("bright", 0.9),
            ]))
        }
    }
}

pub struct Fixture {
    pub logger: LoggerFake,
    pub service: ClassifierService,
    pub receiver: StateReceiver,
}

impl Fixture {
    pub fn with_loader(loader: Arc<dyn ImageClassifierLoader + Send + Sync>) -> Self {
        let logger = LoggerFake::new();
        let service = ClassifierService::new(loader, Arc::new(logger.clone()));
        let receiver = service.subscribe();

        Self {
            logger,
            service,
            receiver,
        }
    }

    pub fn with_classifier(classifier: Arc<dyn ImageClassifier + Send + Sync>) -> Self {
        Self::with_loader(Arc::new(LoaderFresh::new(move || Ok(classifier.clone()))))
    }

    pub fn scripted(output: Result<InferenceOutput, String>) -> (Self, Arc<ImageClassifierFake>) {
        let classifier = Arc::new(ImageClassifierFake::scripted(
            Arc::new(LoggerFake::new()),
            output,
            Duration::ZERO,
        ));
        (Self::with_classifier(classifier.clone()), classifier)
    }

    /// Collects states until a terminal one arrives (or a second passes).
    pub fn states_until_terminal(&self) -> Vec<crate::classifier_service::core::ClassificationState> {
        let mut states = Vec::new();
        while let Some(state) = self.receiver.recv_timeout(Duration::from_secs(1)) {
            let terminal = state.is_terminal();
            states.push(state);
            if terminal {
                break;
            }
        }
        states
    }
}

pub fn solid_image(value: u8) -> DynamicImage {
    let mut img = ImageBuffer::new(16, 16);
    for pixel in img.pixels_mut() {
        *pixel = Rgb([value, value, value]);
    }
    DynamicImage::ImageRgb8(img)
}
