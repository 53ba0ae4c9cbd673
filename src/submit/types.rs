//! Data types for drawing submission.

use crate::draw::DrawError;
use crate::input::StrokeRenderer;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// A drawing queued for classification.
#[derive(Clone)]
pub struct SubmitRequest {
    /// `data:image/png;base64,...` payload
    pub data_url: String,
    /// When set, speech clips for every label are downloaded here.
    pub speech_dir: Option<PathBuf>,
}

impl std::fmt::Debug for SubmitRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitRequest")
            .field("data_url_len", &self.data_url.len())
            .field("speech_dir", &self.speech_dir)
            .finish()
    }
}

impl SubmitRequest {
    /// Snapshots the renderer's surface into a request.
    ///
    /// Encoding happens here, on the caller's thread, so network tasks never
    /// touch the surface.
    pub fn from_renderer(renderer: &StrokeRenderer) -> Result<Self, DrawError> {
        Ok(Self {
            data_url: renderer.export_data_url()?,
            speech_dir: None,
        })
    }

    pub fn with_speech_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.speech_dir = Some(dir.into());
        self
    }
}

/// One predicted label with its illustration.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCard {
    /// Raw label as returned by the classifier
    pub label: String,
    /// Label with underscores replaced by spaces
    pub words: String,
    /// Representative image; `None` when image search is disabled
    pub image_url: Option<String>,
    /// Text-to-speech link for `words`
    pub speech_url: Url,
    /// Downloaded speech clip, if requested and successful
    pub speech_file: Option<PathBuf>,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResult {
    /// Labels in classifier order
    pub labels: Vec<String>,
    /// Enriched cards in label order; labels whose lookup failed are absent
    pub cards: Vec<LabelCard>,
}

/// Outcome of a submission (success or failure).
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Success(SubmitResult),
    Failed(String),
}

/// An outcome tagged with the id `SubmissionManager::submit` returned.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: u64,
    pub outcome: SubmitOutcome,
}

/// Status of the submission manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Nothing submitted yet.
    Idle,
    /// This many submissions are waiting on the network.
    InFlight(usize),
    /// Every submission so far has finished.
    Done,
}

/// Errors that can occur while submitting a drawing.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to save file: {0}")]
    Save(#[from] std::io::Error),

    #[error("Submission manager not running")]
    ManagerStopped,
}
