// Application state module
// Shared, read-only state handed to every connection

use super::types::Config;
use crate::dispatch::Dispatcher;
use crate::nlp::ClientHandle;
use crate::render::{PageRenderer, RenderError};

pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub renderer: PageRenderer,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// The NLP client is not created here; the dispatcher opens it on the
    /// first request and reuses it afterwards.
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        let client = ClientHandle::from_config(&config.nlp);
        Self::with_client(config, client)
    }

    /// Build state around an already prepared client handle
    pub fn with_client(config: &Config, client: ClientHandle) -> Result<Self, RenderError> {
        let dispatcher = Dispatcher::new(
            client,
            config.nlp.language_code.clone(),
            config.nlp.request_policy,
        );
        let renderer = PageRenderer::from_config(&config.renderer)?;

        Ok(Self {
            config: config.clone(),
            dispatcher,
            renderer,
        })
    }
}

#[cfg(test)]
impl AppState {
    /// Default configuration with the stub NLP backend pre-opened
    pub fn for_tests(client: crate::nlp::StubClient) -> std::sync::Arc<Self> {
        let config = Config::load_from("no-such-config-file").expect("default config");
        let client: std::sync::Arc<dyn crate::nlp::NlpClient> = std::sync::Arc::new(client);
        let state = Self::with_client(&config, ClientHandle::with_client(client))
            .expect("built-in templates");
        std::sync::Arc::new(state)
    }
}
