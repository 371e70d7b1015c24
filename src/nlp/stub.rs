// Deterministic in-process NLP backend
// Used by tests and by `nlp.backend = "stub"` for offline demos

use async_trait::async_trait;

use super::types::{DominantLanguage, Entity, KeyPhrase, PartOfSpeech, SyntaxToken};
use super::{NlpClient, NlpError, NlpResult};

/// Answers every call with fixed results derived only from the input text.
///
/// A failing stub returns the same `NlpError::Service` for every call.
#[derive(Debug, Clone, Default)]
pub struct StubClient {
    failure: Option<String>,
}

impl StubClient {
    pub const fn new() -> Self {
        Self { failure: None }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }

    fn check(&self) -> NlpResult<()> {
        match &self.failure {
            Some(message) => Err(NlpError::Service(message.clone())),
            None => Ok(()),
        }
    }
}

fn span(text: &str) -> (Option<i32>, Option<i32>) {
    let len = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
    (Some(0), Some(len))
}

#[async_trait]
impl NlpClient for StubClient {
    async fn detect_sentiment(&self, _text: &str, _language_code: &str) -> NlpResult<String> {
        self.check()?;
        Ok("POSITIVE".to_string())
    }

    async fn detect_dominant_language(&self, _text: &str) -> NlpResult<Vec<DominantLanguage>> {
        self.check()?;
        Ok(vec![DominantLanguage {
            language_code: Some("fr".to_string()),
            score: Some(0.98),
        }])
    }

    async fn detect_entities(&self, text: &str, _language_code: &str) -> NlpResult<Vec<Entity>> {
        self.check()?;
        let (begin_offset, end_offset) = span(text);
        Ok(vec![Entity {
            text: Some(text.to_string()),
            entity_type: Some("OTHER".to_string()),
            score: Some(0.9),
            begin_offset,
            end_offset,
        }])
    }

    async fn detect_key_phrases(
        &self,
        text: &str,
        _language_code: &str,
    ) -> NlpResult<Vec<KeyPhrase>> {
        self.check()?;
        let (begin_offset, end_offset) = span(text);
        Ok(vec![KeyPhrase {
            text: Some(text.to_string()),
            score: Some(0.9),
            begin_offset,
            end_offset,
        }])
    }

    async fn detect_syntax(
        &self,
        text: &str,
        _language_code: &str,
    ) -> NlpResult<Vec<SyntaxToken>> {
        self.check()?;
        let (begin_offset, end_offset) = span(text);
        Ok(vec![SyntaxToken {
            token_id: Some(1),
            text: Some(text.to_string()),
            part_of_speech: Some(PartOfSpeech {
                tag: Some("NOUN".to_string()),
                score: Some(0.9),
            }),
            begin_offset,
            end_offset,
        }])
    }
}
