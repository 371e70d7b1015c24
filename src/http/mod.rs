//! HTTP protocol layer module
//!
//! Request inspection and response builders shared by the page and API
//! services, kept apart from the NLP and rendering logic.

pub mod access;
pub mod request;
pub mod response;

// Re-export commonly used items
pub use access::AccessRecord;
pub use request::{
    client_address, exceeds_declared_length, read_body, user_agent, version_label,
};
pub use response::{
    build_405_response, build_500_response, build_html_response,
    build_json_response, build_options_response,
};
