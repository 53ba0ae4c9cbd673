//! HTTP implementations of the submission collaborators (reqwest).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::dependencies::{ImageSearch, PredictionService, SpeechSynth};
use super::types::SubmitError;

/// Builds the shared client with a per-request timeout.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, SubmitError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("scribblepad/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

#[derive(Deserialize)]
struct PredictionResponse {
    result: Vec<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchPhoto>,
}

#[derive(Deserialize)]
struct SearchPhoto {
    urls: PhotoUrls,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Extracts the label list from a prediction response body.
pub fn parse_prediction(body: &str) -> Result<Vec<String>, SubmitError> {
    serde_json::from_str::<PredictionResponse>(body)
        .map(|response| response.result)
        .map_err(|err| SubmitError::InvalidResponse(format!("prediction: {err}")))
}

/// Picks the first photo's regular-size URL from a search response body.
pub fn parse_search(body: &str) -> Result<Option<String>, SubmitError> {
    let response = serde_json::from_str::<SearchResponse>(body)
        .map_err(|err| SubmitError::InvalidResponse(format!("image search: {err}")))?;
    Ok(response
        .results
        .into_iter()
        .next()
        .map(|photo| photo.urls.regular))
}

/// Posts drawings as an `image` form field and reads `{"result": [...]}`.
pub struct HttpPredictor {
    client: reqwest::Client,
    url: Url,
}

impl HttpPredictor {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl PredictionService for HttpPredictor {
    async fn predict(&self, data_url: &str) -> Result<Vec<String>, SubmitError> {
        log::debug!("POST {} ({} byte payload)", self.url, data_url.len());
        let body = self
            .client
            .post(self.url.clone())
            .form(&[("image", data_url)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_prediction(&body)
    }
}

/// Photo search in the Unsplash API shape (`query` + `client_id`).
pub struct UnsplashSearch {
    client: reqwest::Client,
    endpoint: Url,
    access_key: String,
}

impl UnsplashSearch {
    pub fn new(client: reqwest::Client, endpoint: Url, access_key: String) -> Self {
        Self {
            client,
            endpoint,
            access_key,
        }
    }

    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("client_id", &self.access_key);
        url
    }
}

#[async_trait]
impl ImageSearch for UnsplashSearch {
    async fn find_image(&self, query: &str) -> Result<Option<String>, SubmitError> {
        let body = self
            .client
            .get(self.search_url(query))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_search(&body)
    }
}

/// Text-to-speech links in the translate_tts shape.
pub struct TranslateSpeech {
    client: reqwest::Client,
    endpoint: Url,
    language: String,
}

impl TranslateSpeech {
    pub fn new(client: reqwest::Client, endpoint: Url, language: String) -> Self {
        Self {
            client,
            endpoint,
            language,
        }
    }
}

#[async_trait]
impl SpeechSynth for TranslateSpeech {
    fn speech_url(&self, words: &str) -> Result<Url, SubmitError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("q", words)
            .append_pair("tl", &self.language)
            .append_pair("client", "tw-ob");
        Ok(url)
    }

    async fn fetch_speech(&self, url: &Url) -> Result<Vec<u8>, SubmitError> {
        let bytes = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}
