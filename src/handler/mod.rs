//! Page handler module
//!
//! Serves the rendered demo pages on the application listener.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
