// Process-wide NLP client handle
// Opened on first use, then shared by every request for the process lifetime

use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{ComprehendClient, NlpClient, StubClient};
use crate::config::{NlpBackend, NlpConfig};

/// Open-once guard around the NLP client.
///
/// Concurrent first calls wait on the same initialisation; the client is
/// never replaced once set.
pub struct ClientHandle {
    backend: NlpBackend,
    region: Option<String>,
    endpoint_url: Option<String>,
    cell: OnceCell<Arc<dyn NlpClient>>,
}

impl ClientHandle {
    pub fn from_config(config: &NlpConfig) -> Self {
        Self {
            backend: config.backend,
            region: config.region.clone(),
            endpoint_url: config.endpoint_url.clone(),
            cell: OnceCell::new(),
        }
    }

    /// Handle that is already open on the given client
    pub fn with_client(client: Arc<dyn NlpClient>) -> Self {
        Self {
            backend: NlpBackend::Stub,
            region: None,
            endpoint_url: None,
            cell: OnceCell::new_with(Some(client)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the shared client, opening it on first use
    pub async fn get(&self) -> Arc<dyn NlpClient> {
        let client = self
            .cell
            .get_or_init(|| async {
                crate::logger::log_nlp_client_open(self.backend, self.region.as_deref());
                match self.backend {
                    NlpBackend::Comprehend => Arc::new(
                        ComprehendClient::connect(
                            self.region.as_deref(),
                            self.endpoint_url.as_deref(),
                        )
                        .await,
                    ) as Arc<dyn NlpClient>,
                    NlpBackend::Stub => Arc::new(StubClient::new()) as Arc<dyn NlpClient>,
                }
            })
            .await;
        Arc::clone(client)
    }
}
