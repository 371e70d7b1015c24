//! Logger module
//!
//! Provides logging utilities for both services:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Per-request source address and NLP failure logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, NlpBackend};
use crate::nlp::NlpError;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_server_start(app_addr: &SocketAddr, api_addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Comprehend demo started");
    write_info(&format!("Pages listening on: http://{app_addr}"));
    write_info(&format!("API listening on:   http://{api_addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info(&format!(
        "NLP backend: {:?}, language code: {}, request policy: {:?}",
        config.nlp.backend, config.nlp.language_code, config.nlp.request_policy
    ));
    write_info(&format!("Page API base path: {}", config.renderer.api));
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr, prefix: &str) {
    write_info(&format!("[{prefix}] Accepted connection from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

/// Caller address of a dispatch request, logged whatever the outcome
pub fn log_source_address(source: &str) {
    write_info(&format!("[Source] {source}"));
}

pub fn log_nlp_error(action: &str, err: &NlpError) {
    write_error(&format!("[NLP ERROR] {action}: {err}"));
}

pub fn log_nlp_client_open(backend: NlpBackend, region: Option<&str>) {
    write_info(&format!(
        "[NLP] Opening {backend:?} client (region: {})",
        region.unwrap_or("default chain")
    ));
}

pub fn log_render_error(path: &str, err: &impl std::fmt::Display) {
    write_error(&format!("[RENDER ERROR] {path}: {err}"));
}

pub fn log_template_override(name: &str, path: &str) {
    write_info(&format!("[Templates] {name} loaded from {path}"));
}

pub fn log_shutdown(prefix: &str) {
    write_info(&format!("[{prefix}] Shutdown requested, no longer accepting connections"));
}
