//! NLP service module
//!
//! Everything the dispatcher needs to talk to the external text-analysis
//! service:
//! - `Operation`: the five supported detections and their response shaping
//! - `NlpClient`: one async method per detection, implemented by the
//!   Comprehend backend and by a deterministic stub
//! - `ClientHandle`: the process-wide, open-once client

mod comprehend;
mod handle;
mod operation;
mod stub;
mod types;

use async_trait::async_trait;

pub use comprehend::ComprehendClient;
pub use handle::ClientHandle;
pub use operation::Operation;
pub use stub::StubClient;
pub use types::{DominantLanguage, Entity, KeyPhrase, PartOfSpeech, SyntaxToken};

/// Errors surfaced by an NLP call.
///
/// The `Display` text is returned to callers verbatim.
#[derive(Debug, thiserror::Error)]
pub enum NlpError {
    /// The external service rejected or failed the call
    #[error("{0}")]
    Service(String),
    /// The service answered but the result could not be encoded
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type NlpResult<T> = Result<T, NlpError>;

#[async_trait]
pub trait NlpClient: Send + Sync {
    /// Overall sentiment label, e.g. `POSITIVE`
    async fn detect_sentiment(&self, text: &str, language_code: &str) -> NlpResult<String>;

    async fn detect_dominant_language(&self, text: &str) -> NlpResult<Vec<DominantLanguage>>;

    async fn detect_entities(&self, text: &str, language_code: &str) -> NlpResult<Vec<Entity>>;

    async fn detect_key_phrases(
        &self,
        text: &str,
        language_code: &str,
    ) -> NlpResult<Vec<KeyPhrase>>;

    async fn detect_syntax(&self, text: &str, language_code: &str)
        -> NlpResult<Vec<SyntaxToken>>;
}
