//! Access log bookkeeping for one request

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::time::Instant;

use super::request::{user_agent, version_label};
use crate::config::LoggingConfig;
use crate::logger::{self, AccessLogEntry};

/// Started when a request arrives, written once its response is built
pub struct AccessRecord {
    entry: AccessLogEntry,
    started: Instant,
}

impl AccessRecord {
    pub fn begin<B>(service: &'static str, req: &Request<B>, remote_addr: String) -> Self {
        let mut entry = AccessLogEntry::new(
            service,
            remote_addr,
            req.method().to_string(),
            req.uri().path().to_string(),
        );
        entry.http_version = version_label(req.version()).to_string();
        entry.user_agent = user_agent(req.headers());

        Self {
            entry,
            started: Instant::now(),
        }
    }

    pub fn finish(mut self, response: &Response<Full<Bytes>>, logging: &LoggingConfig) {
        if !logging.access_log {
            return;
        }
        self.entry.status = response.status().as_u16();
        self.entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        self.entry.request_time_us =
            u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&self.entry, &logging.access_log_format);
    }
}
