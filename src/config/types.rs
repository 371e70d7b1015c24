// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub nlp: NlpConfig,
    pub renderer: RendererConfig,
}

/// Server configuration
///
/// The app listener serves the demo pages, the API listener serves the
/// NLP dispatcher.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_host: String,
    pub api_port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// `combined`, `common`, `json` or a custom `$variable` pattern
    pub access_log_format: String,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Which `NlpClient` implementation backs the dispatcher
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NlpBackend {
    Comprehend,
    Stub,
}

/// What the dispatcher does with a body it cannot route
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestPolicy {
    /// 400 with a JSON message
    Reject,
    /// 200 with an empty body
    Legacy,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NlpConfig {
    pub backend: NlpBackend,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub language_code: String,
    pub request_policy: RequestPolicy,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RendererConfig {
    pub title: String,
    pub api: String,
    /// Prefix for page links, e.g. `/prod` behind an API Gateway stage
    #[serde(default)]
    pub base_path: String,
    /// Whether `api` came from `API_BASE_PATH`, which outranks the constants file
    #[serde(skip)]
    pub api_from_env: bool,
    /// Legacy JSON file with `title` and `api` keys
    pub constants_file: Option<String>,
    /// Directory holding `<name>.hbs` template overrides
    pub template_dir: Option<String>,
}

/// Contents of the legacy constants file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PageConstants {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub api: String,
}
