use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::config::ServiceConfig;
use crate::submit::{
    http::{HttpPredictor, TranslateSpeech, UnsplashSearch, build_client},
    types::SubmitError,
};

/// Classifies an encoded drawing.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Returns labels in the service's ranking order.
    async fn predict(&self, data_url: &str) -> Result<Vec<String>, SubmitError>;
}

/// Finds a representative picture for a label.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// `Ok(None)` when the search has no results.
    async fn find_image(&self, query: &str) -> Result<Option<String>, SubmitError>;
}

/// Produces pronunciation audio for a label.
#[async_trait]
pub trait SpeechSynth: Send + Sync {
    fn speech_url(&self, words: &str) -> Result<Url, SubmitError>;

    async fn fetch_speech(&self, url: &Url) -> Result<Vec<u8>, SubmitError>;
}

/// Bundle of collaborators used by the submission pipeline. Each one can be mocked in tests.
#[derive(Clone)]
pub struct SubmitDependencies {
    pub predictor: Arc<dyn PredictionService>,
    /// `None` disables image lookups; cards are then returned without pictures.
    pub image_search: Option<Arc<dyn ImageSearch>>,
    pub speech: Arc<dyn SpeechSynth>,
}

impl SubmitDependencies {
    /// Builds HTTP-backed collaborators from the `[service]` config section.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, SubmitError> {
        let client = build_client(config.timeout_secs)?;

        let image_search: Option<Arc<dyn ImageSearch>> = if config.image_search_key.is_empty() {
            log::info!("No image search key configured; label cards will have no pictures");
            None
        } else {
            Some(Arc::new(UnsplashSearch::new(
                client.clone(),
                Url::parse(&config.image_search_url)?,
                config.image_search_key.clone(),
            )))
        };

        Ok(Self {
            predictor: Arc::new(HttpPredictor::new(
                client.clone(),
                Url::parse(&config.predict_url)?,
            )),
            image_search,
            speech: Arc::new(TranslateSpeech::new(
                client,
                Url::parse(&config.speech_url)?,
                config.speech_language.clone(),
            )),
        })
    }
}
