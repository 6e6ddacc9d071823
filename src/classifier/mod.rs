pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Classification;

/// Why a single classification call produced no result.
///
/// Transient and permanent failures are not distinguished; every variant
/// is a hard stop for the item being classified.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("license description is empty")]
    EmptyInput,

    #[error("request to model service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("classification timed out after {0:?}")]
    TimedOut(std::time::Duration),

    #[error("model refused to classify: {0}")]
    Refused(String),

    #[error("malformed classification response: {0}")]
    Malformed(String),
}

/// Turns a license description into a category plus a short explanation.
/// Could be a hosted model or a test script.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError>;
}
