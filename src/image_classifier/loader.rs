use crate::config::{Config, EngineKind};
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use crate::image_classifier::interface::{ImageClassifier, ImageClassifierLoader};
use crate::library::logger::interface::Logger;
use std::sync::{Arc, Mutex, PoisonError};

type LoadFn = dyn Fn() -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>
    + Send
    + Sync;

/// Builds a new engine on every call.
pub struct LoaderFresh {
    load_fn: Box<LoadFn>,
}

impl LoaderFresh {
    pub fn new<F>(load_fn: F) -> Self
    where
        F: Fn() -> Result<
                Arc<dyn ImageClassifier + Send + Sync>,
                Box<dyn std::error::Error + Send + Sync>,
            > + Send
            + Sync
            + 'static,
    {
        Self {
            load_fn: Box::new(load_fn),
        }
    }
}

impl ImageClassifierLoader for LoaderFresh {
    fn load(
        &self,
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>
    {
        (self.load_fn)()
    }
}

/// Loads once and hands out the same handle afterwards. Failed loads are
/// not cached, so a later call tries again.
pub struct LoaderCached {
    inner: Arc<dyn ImageClassifierLoader + Send + Sync>,
    cached: Mutex<Option<Arc<dyn ImageClassifier + Send + Sync>>>,
}

impl LoaderCached {
    pub fn new(inner: Arc<dyn ImageClassifierLoader + Send + Sync>) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }
}

impl ImageClassifierLoader for LoaderCached {
    fn load(
        &self,
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>
    {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(classifier) = cached.as_ref() {
            return Ok(classifier.clone());
        }
        let classifier = self.inner.load()?;
        *cached = Some(classifier.clone());
        Ok(classifier)
    }
}

pub fn from_config(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn ImageClassifierLoader + Send + Sync> {
    let fresh: Arc<dyn ImageClassifierLoader + Send + Sync> = match config.engine {
        EngineKind::Fake => {
            let delay = config.fake_engine_delay;
            Arc::new(LoaderFresh::new(move || {
                Ok(Arc::new(ImageClassifierFake::random(logger.clone(), delay))
                    as Arc<dyn ImageClassifier + Send + Sync>)
            }))
        }
        EngineKind::TractOnnx => {
            let model = config.model.clone();
            Arc::new(LoaderFresh::new(move || {
                Ok(Arc::new(ImageClassifierTractOnnx::new(model.clone(), logger.clone())?)
                    as Arc<dyn ImageClassifier + Send + Sync>)
            }))
        }
    };

    if config.cache_engine {
        Arc::new(LoaderCached::new(fresh))
    } else {
        fresh
    }
}
