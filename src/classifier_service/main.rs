use crate::classifier_service::core::{to_results, ClassificationState, ClassifyError};
use crate::image_classifier::interface::{ImageClassifier, ImageClassifierLoader, InferenceOutput};
use crate::image_classifier::pixel_buffer::PixelBuffer;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Envelope {
    generation: u64,
    state: ClassificationState,
}

/// Shared between the service and its inference workers.
#[derive(Clone)]
struct Publisher {
    latest_generation: Arc<AtomicU64>,
    subscriber: Arc<Mutex<Option<Sender<Envelope>>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Publisher {
    fn next_generation(&self) -> u64 {
        self.latest_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.latest_generation.load(Ordering::SeqCst) != generation
    }

    fn publish(&self, generation: u64, state: ClassificationState) {
        if self.is_superseded(generation) {
            let _ = self.logger.info(&format!(
                "Dropping {:?} from superseded call #{}",
                state, generation
            ));
            return;
        }

        let mut subscriber = self.subscriber.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = subscriber.as_ref() else {
            let _ = self
                .logger
                .info(&format!("No subscriber for {:?} of call #{}", state, generation));
            return;
        };

        if sender.send(Envelope { generation, state }).is_err() {
            let _ = self.logger.info("Subscriber went away, detaching");
            *subscriber = None;
        }
    }
}

/// The consuming end of the state channel. Drain it on the thread that
/// owns the display; states from superseded calls are skipped here as
/// well, in case they were queued before a newer call began.
pub struct StateReceiver {
    receiver: Receiver<Envelope>,
    latest_generation: Arc<AtomicU64>,
}

impl StateReceiver {
    fn is_current(&self, envelope: &Envelope) -> bool {
        envelope.generation == self.latest_generation.load(Ordering::SeqCst)
    }

    /// Next pending state, without blocking.
    pub fn try_recv(&self) -> Option<ClassificationState> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) if self.is_current(&envelope) => return Some(envelope.state),
                Ok(_) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Waits up to `timeout` for the next current state.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClassificationState> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(envelope) if self.is_current(&envelope) => return Some(envelope.state),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    /// Everything currently pending, oldest first.
    pub fn drain(&self) -> Vec<ClassificationState> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

pub struct ClassifierService {
    loader: Arc<dyn ImageClassifierLoader + Send + Sync>,
    publisher: Publisher,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ClassifierService {
    pub fn new(
        loader: Arc<dyn ImageClassifierLoader + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        let logger = logger.with_namespace("classifier_service");
        Self {
            loader,
            publisher: Publisher {
                latest_generation: Arc::new(AtomicU64::new(0)),
                subscriber: Arc::new(Mutex::new(None)),
                logger: logger.clone(),
            },
            logger,
        }
    }

    /// Attaches the single subscriber, replacing (and disconnecting) any
    /// previous one.
    pub fn subscribe(&self) -> StateReceiver {
        let (sender, receiver) = channel();
        *self
            .publisher
            .subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(sender);
        StateReceiver {
            receiver,
            latest_generation: self.publisher.latest_generation.clone(),
        }
    }

    pub fn unsubscribe(&self) {
        *self
            .publisher
            .subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Publishes `Started` before returning, then either `Failed` right
    /// away (engine or image unusable) or a terminal state from a
    /// background worker once inference finishes.
    pub fn classify(&self, image: &DynamicImage) {
        let generation = self.publisher.next_generation();
        let _ = self.logger.info(&format!(
            "Call #{}: classifying {}x{} image",
            generation,
            image.width(),
            image.height()
        ));
        self.publisher
            .publish(generation, ClassificationState::Started);

        let (classifier, buffer) = match self.prepare(image) {
            Ok(prepared) => prepared,
            Err(error) => {
                self.fail(generation, &error);
                return;
            }
        };

        let publisher = self.publisher.clone();
        let logger = self.logger.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("classify-{}", generation))
            .spawn(move || {
                if publisher.is_superseded(generation) {
                    let _ = logger.info(&format!(
                        "Call #{} superseded before inference, skipping",
                        generation
                    ));
                    return;
                }

                let state = match run_inference(classifier.as_ref(), &buffer) {
                    Ok(state) => state,
                    Err(error) => {
                        log_failure(logger.as_ref(), generation, &error);
                        ClassificationState::Failed
                    }
                };
                publisher.publish(generation, state);
            });

        if let Err(error) = spawned {
            self.fail(generation, &ClassifyError::Worker(error.to_string()));
        }
    }

    fn prepare(
        &self,
        image: &DynamicImage,
    ) -> Result<(Arc<dyn ImageClassifier + Send + Sync>, PixelBuffer), ClassifyError> {
        let classifier = self
            .loader
            .load()
            .map_err(|e| ClassifyError::EngineUnavailable(e.to_string()))?;
        let (width, height) = classifier.input_size();
        let buffer = PixelBuffer::from_image(image, width, height)
            .map_err(|e| ClassifyError::UnsupportedImage(e.to_string()))?;
        Ok((classifier, buffer))
    }

    fn fail(&self, generation: u64, error: &ClassifyError) {
        log_failure(self.logger.as_ref(), generation, error);
        self.publisher
            .publish(generation, ClassificationState::Failed);
    }
}

fn log_failure(logger: &dyn Logger, generation: u64, error: &ClassifyError) {
    let stage = if error.is_setup_failure() {
        "setup"
    } else {
        "inference"
    };
    let _ = logger.info(&format!(
        "Call #{} failed during {}: {}",
        generation, stage, error
    ));
}

fn run_inference(
    classifier: &dyn ImageClassifier,
    buffer: &PixelBuffer,
) -> Result<ClassificationState, ClassifyError> {
    match classifier.infer(buffer) {
        Ok(InferenceOutput::Classifications(classifications)) => Ok(
            ClassificationState::Completed(to_results(&classifications)),
        ),
        Ok(InferenceOutput::Unrecognized { kind }) => Err(ClassifyError::UnrecognizedOutput(kind)),
        Err(error) => Err(ClassifyError::Inference(error.to_string())),
    }
}
