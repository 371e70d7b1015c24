//! Result records returned by the NLP service
//!
//! Field names follow the service schema in camelCase. Fields the service
//! leaves unset are kept and serialised as `null`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantLanguage {
    pub language_code: Option<String>,
    pub score: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub score: Option<f32>,
    pub begin_offset: Option<i32>,
    pub end_offset: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPhrase {
    pub text: Option<String>,
    pub score: Option<f32>,
    pub begin_offset: Option<i32>,
    pub end_offset: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxToken {
    pub token_id: Option<i32>,
    pub text: Option<String>,
    pub part_of_speech: Option<PartOfSpeech>,
    pub begin_offset: Option<i32>,
    pub end_offset: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartOfSpeech {
    pub tag: Option<String>,
    pub score: Option<f32>,
}
