//! The closed set of NLP operations and their response shaping

use std::fmt;

use super::{NlpClient, NlpError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Sentiment,
    DominantLanguage,
    Entities,
    KeyPhrases,
    Syntax,
}

impl Operation {
    pub const ALL: [Self; 5] = [
        Self::Sentiment,
        Self::DominantLanguage,
        Self::Entities,
        Self::KeyPhrases,
        Self::Syntax,
    ];

    /// Map a request `action` to an operation. Case-sensitive.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "detectsentiment" => Some(Self::Sentiment),
            "detectdominantlanguage" => Some(Self::DominantLanguage),
            "detectentities" => Some(Self::Entities),
            "detectkeyphrases" => Some(Self::KeyPhrases),
            "detectsyntax" => Some(Self::Syntax),
            _ => None,
        }
    }

    /// Pick the demo page for a request path.
    ///
    /// `/detect/entities`, `detect-entities` and `/detect-entities/` all
    /// select `Entities`. Only the trailing segments count, so a stage or
    /// base-path prefix such as `/prod/detect/entities` selects the same page.
    /// Anything unrecognised shows the sentiment page.
    pub fn from_page_selector(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let selector = match segments.as_slice() {
            [.., "detect", page] => format!("detect-{page}"),
            [.., last] => (*last).to_string(),
            [] => String::new(),
        };

        match selector.as_str() {
            "detect-dominantlanguage" => Self::DominantLanguage,
            "detect-entities" => Self::Entities,
            "detect-keyphrases" => Self::KeyPhrases,
            "detect-syntax" => Self::Syntax,
            _ => Self::Sentiment,
        }
    }

    pub const fn action(self) -> &'static str {
        match self {
            Self::Sentiment => "detectsentiment",
            Self::DominantLanguage => "detectdominantlanguage",
            Self::Entities => "detectentities",
            Self::KeyPhrases => "detectkeyphrases",
            Self::Syntax => "detectsyntax",
        }
    }

    /// Name used in page titles, e.g. `Detect KeyPhrases`
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sentiment => "Sentiment",
            Self::DominantLanguage => "DominantLanguage",
            Self::Entities => "Entities",
            Self::KeyPhrases => "KeyPhrases",
            Self::Syntax => "Syntax",
        }
    }

    pub const fn needs_language_code(self) -> bool {
        !matches!(self, Self::DominantLanguage)
    }

    /// Call the service and shape the result into the response `message`.
    ///
    /// Sentiment yields the bare label; every other operation yields its
    /// result list encoded as a JSON array string.
    pub async fn run(
        self,
        client: &dyn NlpClient,
        text: &str,
        language_code: &str,
    ) -> Result<String, NlpError> {
        match self {
            Self::Sentiment => client.detect_sentiment(text, language_code).await,
            Self::DominantLanguage => {
                let languages = client.detect_dominant_language(text).await?;
                Ok(serde_json::to_string(&languages)?)
            }
            Self::Entities => {
                let entities = client.detect_entities(text, language_code).await?;
                Ok(serde_json::to_string(&entities)?)
            }
            Self::KeyPhrases => {
                let phrases = client.detect_key_phrases(text, language_code).await?;
                Ok(serde_json::to_string(&phrases)?)
            }
            Self::Syntax => {
                let tokens = client.detect_syntax(text, language_code).await?;
                Ok(serde_json::to_string(&tokens)?)
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::StubClient;

    #[test]
    fn test_from_action_exact_match() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_action(op.action()), Some(op));
        }
        assert_eq!(Operation::from_action("DetectSentiment"), None);
        assert_eq!(Operation::from_action("detectsentiment "), None);
        assert_eq!(Operation::from_action(""), None);
    }

    #[test]
    fn test_page_selector_normalisation() {
        assert_eq!(Operation::from_page_selector("/detect/entities"), Operation::Entities);
        assert_eq!(Operation::from_page_selector("detect-entities"), Operation::Entities);
        assert_eq!(Operation::from_page_selector("/detect-keyphrases/"), Operation::KeyPhrases);
        assert_eq!(
            Operation::from_page_selector("/detect/dominantlanguage"),
            Operation::DominantLanguage
        );
        assert_eq!(Operation::from_page_selector("/detect/syntax"), Operation::Syntax);
    }

    #[test]
    fn test_page_selector_ignores_stage_prefix() {
        assert_eq!(
            Operation::from_page_selector("/prod/detect/entities"),
            Operation::Entities
        );
        assert_eq!(
            Operation::from_page_selector("/nlp/v1/detect-syntax"),
            Operation::Syntax
        );
        assert_eq!(Operation::from_page_selector("/prod/"), Operation::Sentiment);
    }

    #[test]
    fn test_page_selector_falls_back_to_sentiment() {
        assert_eq!(Operation::from_page_selector("/"), Operation::Sentiment);
        assert_eq!(Operation::from_page_selector(""), Operation::Sentiment);
        assert_eq!(Operation::from_page_selector("/detect/unknown"), Operation::Sentiment);
        assert_eq!(Operation::from_page_selector("/detect/sentiment"), Operation::Sentiment);
    }

    #[test]
    fn test_language_code_usage() {
        assert!(!Operation::DominantLanguage.needs_language_code());
        assert!(Operation::Syntax.needs_language_code());
    }

    #[tokio::test]
    async fn test_sentiment_is_bare_label() {
        let stub = StubClient::new();
        let out = Operation::Sentiment.run(&stub, "I love this.", "en").await.unwrap();
        assert_eq!(out, "POSITIVE");
    }

    #[tokio::test]
    async fn test_list_operations_are_json_arrays() {
        let stub = StubClient::new();
        for op in [
            Operation::DominantLanguage,
            Operation::Entities,
            Operation::KeyPhrases,
            Operation::Syntax,
        ] {
            let out = op.run(&stub, "Bonjour", "en").await.unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
            assert!(parsed.is_array(), "{op} did not yield an array: {out}");
        }
    }

    #[tokio::test]
    async fn test_result_field_shapes() {
        let stub = StubClient::new();

        let out = Operation::Entities.run(&stub, "Seattle", "en").await.unwrap();
        let first = &serde_json::from_str::<serde_json::Value>(&out).unwrap()[0];
        for key in ["text", "type", "score", "beginOffset", "endOffset"] {
            assert!(first.get(key).is_some(), "entity missing {key}");
        }

        let out = Operation::KeyPhrases.run(&stub, "Seattle", "en").await.unwrap();
        let first = &serde_json::from_str::<serde_json::Value>(&out).unwrap()[0];
        for key in ["text", "score", "beginOffset", "endOffset"] {
            assert!(first.get(key).is_some(), "key phrase missing {key}");
        }

        let out = Operation::Syntax.run(&stub, "Seattle", "en").await.unwrap();
        let first = &serde_json::from_str::<serde_json::Value>(&out).unwrap()[0];
        for key in ["text", "partOfSpeech", "beginOffset", "endOffset"] {
            assert!(first.get(key).is_some(), "syntax token missing {key}");
        }
    }

    #[tokio::test]
    async fn test_service_failure_propagates() {
        let stub = StubClient::failing("ThrottlingException: Rate exceeded");
        let err = Operation::KeyPhrases.run(&stub, "text", "en").await.unwrap_err();
        assert_eq!(err.to_string(), "ThrottlingException: Rate exceeded");
    }
}
