//! Drawing submission: classification plus per-label illustration.
//!
//! This module provides:
//! - Async collaborator traits for prediction, image search and speech
//! - reqwest-backed implementations of those traits
//! - A background manager that runs submissions without blocking drawing

pub mod dependencies;
pub mod http;
pub mod manager;
pub mod pipeline;
pub mod types;

#[cfg(test)]
mod tests;

pub use dependencies::{ImageSearch, PredictionService, SpeechSynth, SubmitDependencies};
pub use manager::SubmissionManager;
pub use types::{
    LabelCard, Submission, SubmitError, SubmitOutcome, SubmitRequest, SubmitResult, SubmitStatus,
};
