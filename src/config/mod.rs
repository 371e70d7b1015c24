// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, NlpBackend, NlpConfig, PageConstants, PerformanceConfig,
    RendererConfig, RequestPolicy, ServerConfig,
};

/// Environment variable selecting the NLP service region
pub const REGION_ENV: &str = "REGION";
/// Environment variable overriding the API base path shown on the pages
pub const API_BASE_PATH_ENV: &str = "API_BASE_PATH";

impl Config {
    /// Load configuration from the default `config` file (any supported extension)
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_path, None)
    }

    /// Same as `load_from`, reading variables from `env` instead of the
    /// process environment when given
    fn load_with_env(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let lookup = |key: &str| match &env {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        let region = lookup(REGION_ENV);
        let api_base_path = lookup(API_BASE_PATH_ENV);

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEMO")
                    .separator("__")
                    .source(env.clone()),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.api_host", "127.0.0.1")?
            .set_default("server.api_port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "comprehend-demo")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("nlp.backend", "comprehend")?
            .set_default("nlp.language_code", "en")?
            .set_default("nlp.request_policy", "reject")?
            .set_default("renderer.title", "Amazon Comprehend Demo")?
            .set_default("renderer.api", "/api")?
            .set_default("renderer.base_path", "")?
            .set_override_option("nlp.region", region)?
            .set_override_option("renderer.api", api_base_path.clone())?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        cfg.renderer.api_from_env = api_base_path.is_some();
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub fn get_api_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.api_host, self.server.api_port)
            .parse()
            .map_err(|e| format!("Invalid API address: {e}"))
    }
}

impl RendererConfig {
    /// Resolve the page title base and API path.
    ///
    /// A configured constants file wins over `title`/`api`, except that an
    /// explicit `API_BASE_PATH` always decides the API path. Empty values in
    /// the file fall back to the configured ones.
    pub fn resolve_constants(&self) -> Result<PageConstants, String> {
        let mut constants = PageConstants {
            title: self.title.clone(),
            api: self.api.clone(),
        };

        if let Some(path) = &self.constants_file {
            let from_file = load_constants_file(path)?;
            if !from_file.title.is_empty() {
                constants.title = from_file.title;
            }
            if !from_file.api.is_empty() && !self.api_from_env {
                constants.api = from_file.api;
            }
        }

        Ok(constants)
    }
}

/// Read the legacy `{"title": ..., "api": ...}` constants file
pub fn load_constants_file(path: &str) -> Result<PageConstants, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read constants file '{path}': {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid constants file '{path}': {e}"))
}
