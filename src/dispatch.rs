//! Dispatcher module
//!
//! Routes a `{action, message}` body to one NLP operation and shapes the
//! `{message}` reply. Transport independent: the hyper API server and the
//! Lambda binary both call `Dispatcher::handle`.

use hyper::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::RequestPolicy;
use crate::logger;
use crate::nlp::{ClientHandle, Operation};

/// Inbound request body. Both fields are optional at the wire level.
#[derive(Debug, Default, Deserialize)]
pub struct DetectRequest {
    pub action: Option<String>,
    pub message: Option<String>,
}

/// Response envelope; `message` is always a string
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectResponse {
    pub message: String,
}

/// Status plus serialised body, ready for any transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    /// `{"message": ...}` body with the given status
    pub fn envelope(status: StatusCode, message: String) -> Self {
        let body = serde_json::to_string(&DetectResponse { message }).unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            r#"{"message":"Internal server error"}"#.to_string()
        });
        Self { status, body }
    }

    const fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            body: String::new(),
        }
    }
}

/// Why a body could not be routed to an operation
#[derive(Debug, Clone, PartialEq, Eq)]
enum Unroutable {
    InvalidJson(String),
    MissingAction,
    UnknownAction(String),
    MissingMessage,
}

impl Unroutable {
    fn describe(&self) -> String {
        match self {
            Self::InvalidJson(e) => format!("Invalid JSON body: {e}"),
            Self::MissingAction => "Missing 'action' field".to_string(),
            Self::UnknownAction(action) => format!("Unknown action: '{action}'"),
            Self::MissingMessage => "Missing 'message' field".to_string(),
        }
    }
}

pub struct Dispatcher {
    client: ClientHandle,
    language_code: String,
    policy: RequestPolicy,
}

impl Dispatcher {
    pub const fn new(client: ClientHandle, language_code: String, policy: RequestPolicy) -> Self {
        Self {
            client,
            language_code,
            policy,
        }
    }

    pub const fn client(&self) -> &ClientHandle {
        &self.client
    }

    /// Handle one request body.
    ///
    /// The source address is logged for every call, whatever the outcome.
    pub async fn handle(&self, body: &[u8], source_ip: Option<&str>) -> Reply {
        logger::log_source_address(source_ip.unwrap_or("-"));

        let (operation, message) = match route(body) {
            Ok(routed) => routed,
            Err(reason) => return self.unroutable(&reason),
        };

        let client = self.client.get().await;
        match operation
            .run(client.as_ref(), &message, &self.language_code)
            .await
        {
            Ok(result) => Reply::envelope(StatusCode::OK, result),
            Err(e) => {
                logger::log_nlp_error(operation.action(), &e);
                Reply::envelope(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }

    fn unroutable(&self, reason: &Unroutable) -> Reply {
        let description = reason.describe();
        match self.policy {
            RequestPolicy::Reject => {
                logger::log_warning(&format!("Rejected request: {description}"));
                Reply::envelope(StatusCode::BAD_REQUEST, description)
            }
            RequestPolicy::Legacy => Reply::empty(),
        }
    }
}

/// Decide which operation a body asks for, and with what text
fn route(body: &[u8]) -> Result<(Operation, String), Unroutable> {
    let request: DetectRequest =
        serde_json::from_slice(body).map_err(|e| Unroutable::InvalidJson(e.to_string()))?;

    let action = request.action.ok_or(Unroutable::MissingAction)?;
    let operation =
        Operation::from_action(&action).ok_or_else(|| Unroutable::UnknownAction(action.clone()))?;
    let message = request.message.ok_or(Unroutable::MissingMessage)?;

    Ok((operation, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{NlpClient, StubClient};
    use std::sync::Arc;

    fn dispatcher(client: StubClient, policy: RequestPolicy) -> Dispatcher {
        let client: Arc<dyn NlpClient> = Arc::new(client);
        Dispatcher::new(ClientHandle::with_client(client), "en".to_string(), policy)
    }

    fn message_of(reply: &Reply) -> String {
        serde_json::from_str::<DetectResponse>(&reply.body)
            .unwrap()
            .message
    }

    #[tokio::test]
    async fn test_sentiment_example() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Reject);
        let reply = d
            .handle(br#"{"action":"detectsentiment","message":"I love this."}"#, Some("10.0.0.1"))
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, r#"{"message":"POSITIVE"}"#);
    }

    #[tokio::test]
    async fn test_dominant_language_example() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Reject);
        let reply = d
            .handle(br#"{"action":"detectdominantlanguage","message":"Bonjour"}"#, None)
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body,
            r#"{"message":"[{\"languageCode\":\"fr\",\"score\":0.98}]"}"#
        );
    }

    #[tokio::test]
    async fn test_every_action_succeeds() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Reject);
        for op in Operation::ALL {
            let body = format!(r#"{{"action":"{}","message":"Amazon is in Seattle"}}"#, op.action());
            let reply = d.handle(body.as_bytes(), None).await;
            assert_eq!(reply.status, StatusCode::OK, "{op}");

            let message = message_of(&reply);
            if op == Operation::Sentiment {
                assert_eq!(message, "POSITIVE");
            } else {
                let parsed: serde_json::Value = serde_json::from_str(&message).unwrap();
                assert!(parsed.as_array().is_some_and(|a| !a.is_empty()), "{op}: {message}");
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_action_rejected() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Reject);
        let reply = d
            .handle(br#"{"action":"detectpii","message":"hello"}"#, None)
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(message_of(&reply), "Unknown action: 'detectpii'");
    }

    #[tokio::test]
    async fn test_action_is_case_sensitive() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Reject);
        let reply = d
            .handle(br#"{"action":"DetectSentiment","message":"hello"}"#, None)
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Reject);

        let reply = d.handle(br#"{"message":"hello"}"#, None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(message_of(&reply), "Missing 'action' field");

        let reply = d.handle(br#"{"action":"detectsyntax"}"#, None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(message_of(&reply), "Missing 'message' field");
    }

    #[tokio::test]
    async fn test_invalid_json_rejected() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Reject);
        let reply = d.handle(b"action=detectsentiment", None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert!(message_of(&reply).starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_legacy_policy_returns_empty_success() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Legacy);
        for body in [
            &br#"{"action":"detectpii","message":"hello"}"#[..],
            br#"{"message":"hello"}"#,
            br#"{"action":"detectsentiment"}"#,
            b"not json",
        ] {
            let reply = d.handle(body, None).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert!(reply.body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_service_failure_is_500_with_text() {
        let d = dispatcher(
            StubClient::failing("TextSizeLimitExceededException: input too long"),
            RequestPolicy::Reject,
        );
        let reply = d
            .handle(br#"{"action":"detectentities","message":"x"}"#, Some("192.0.2.4"))
            .await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            message_of(&reply),
            "TextSizeLimitExceededException: input too long"
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_forwarded() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Reject);
        let reply = d
            .handle(br#"{"action":"detectsentiment","message":""}"#, None)
            .await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let d = dispatcher(StubClient::new(), RequestPolicy::Reject);
        let body = br#"{"action":"detectkeyphrases","message":"The quick brown fox"}"#;
        let first = d.handle(body, None).await;
        let second = d.handle(body, None).await;
        assert_eq!(first, second);
    }
}
