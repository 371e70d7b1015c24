// Amazon Comprehend backend
// Thin mapping between the SDK's request builders / output shapes and our records

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_comprehend::config::Region;
use aws_sdk_comprehend::error::DisplayErrorContext;
use aws_sdk_comprehend::types::{LanguageCode, SyntaxLanguageCode};
use aws_sdk_comprehend::Client;

use super::types::{DominantLanguage, Entity, KeyPhrase, PartOfSpeech, SyntaxToken};
use super::{NlpClient, NlpError, NlpResult};

#[derive(Debug, Clone)]
pub struct ComprehendClient {
    client: Client,
}

impl ComprehendClient {
    /// Load ambient AWS configuration and build a client.
    ///
    /// Without an explicit region the SDK default chain decides
    /// (`AWS_REGION`, shared profile, instance metadata).
    pub async fn connect(region: Option<&str>, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

/// Keep the whole error chain; the SDK's top-level message alone is just "service error"
fn service_error<E>(err: E) -> NlpError
where
    E: std::error::Error + 'static,
{
    NlpError::Service(DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl NlpClient for ComprehendClient {
    async fn detect_sentiment(&self, text: &str, language_code: &str) -> NlpResult<String> {
        let output = self
            .client
            .detect_sentiment()
            .text(text)
            .language_code(LanguageCode::from(language_code))
            .send()
            .await
            .map_err(service_error)?;

        Ok(output
            .sentiment()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default())
    }

    async fn detect_dominant_language(&self, text: &str) -> NlpResult<Vec<DominantLanguage>> {
        let output = self
            .client
            .detect_dominant_language()
            .text(text)
            .send()
            .await
            .map_err(service_error)?;

        Ok(output
            .languages()
            .iter()
            .map(|l| DominantLanguage {
                language_code: l.language_code().map(str::to_string),
                score: l.score(),
            })
            .collect())
    }

    async fn detect_entities(&self, text: &str, language_code: &str) -> NlpResult<Vec<Entity>> {
        let output = self
            .client
            .detect_entities()
            .text(text)
            .language_code(LanguageCode::from(language_code))
            .send()
            .await
            .map_err(service_error)?;

        Ok(output
            .entities()
            .iter()
            .map(|e| Entity {
                text: e.text().map(str::to_string),
                entity_type: e.r#type().map(|t| t.as_str().to_string()),
                score: e.score(),
                begin_offset: e.begin_offset(),
                end_offset: e.end_offset(),
            })
            .collect())
    }

    async fn detect_key_phrases(
        &self,
        text: &str,
        language_code: &str,
    ) -> NlpResult<Vec<KeyPhrase>> {
        let output = self
            .client
            .detect_key_phrases()
            .text(text)
            .language_code(LanguageCode::from(language_code))
            .send()
            .await
            .map_err(service_error)?;

        Ok(output
            .key_phrases()
            .iter()
            .map(|k| KeyPhrase {
                text: k.text().map(str::to_string),
                score: k.score(),
                begin_offset: k.begin_offset(),
                end_offset: k.end_offset(),
            })
            .collect())
    }

    async fn detect_syntax(
        &self,
        text: &str,
        language_code: &str,
    ) -> NlpResult<Vec<SyntaxToken>> {
        let output = self
            .client
            .detect_syntax()
            .text(text)
            .language_code(SyntaxLanguageCode::from(language_code))
            .send()
            .await
            .map_err(service_error)?;

        Ok(output
            .syntax_tokens()
            .iter()
            .map(|t| SyntaxToken {
                token_id: t.token_id(),
                text: t.text().map(str::to_string),
                part_of_speech: t.part_of_speech().map(|p| PartOfSpeech {
                    tag: p.tag().map(|tag| tag.as_str().to_string()),
                    score: p.score(),
                }),
                begin_offset: t.begin_offset(),
                end_offset: t.end_offset(),
            })
            .collect())
    }
}
