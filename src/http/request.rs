//! Request inspection helpers shared by both services

use http_body_util::{BodyExt, Limited};
use hyper::body::{Body, Bytes};
use hyper::{HeaderMap, Version};
use std::net::SocketAddr;

use crate::logger;

/// Caller address: first `X-Forwarded-For` hop when present, else the socket peer
pub fn client_address(headers: &HeaderMap, peer_addr: &SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| peer_addr.ip().to_string(), ToString::to_string)
}

/// Version as written in request lines, e.g. `1.1`
pub fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Whether a declared `Content-Length` exceeds the limit.
///
/// Unparsable values are logged and left to the streaming limit.
pub fn exceeds_declared_length(headers: &HeaderMap, max_body_size: u64) -> bool {
    let Some(content_length) = headers.get("content-length") else {
        return false;
    };
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            false
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                true
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                false
            }
            _ => false,
        },
    )
}

/// Collect a body, refusing to buffer more than `max_body_size` bytes
pub async fn read_body<B>(body: B, max_body_size: u64) -> Option<Bytes>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Some(collected.to_bytes()),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::header::HeaderValue;

    fn peer() -> SocketAddr {
        "198.51.100.7:53211".parse().unwrap()
    }

    #[test]
    fn test_client_address_from_peer() {
        assert_eq!(client_address(&HeaderMap::new(), &peer()), "198.51.100.7");
    }

    #[test]
    fn test_client_address_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.5, 10.0.0.2"),
        );
        assert_eq!(client_address(&headers, &peer()), "203.0.113.5");
    }

    #[test]
    fn test_declared_length_check() {
        let mut headers = HeaderMap::new();
        assert!(!exceeds_declared_length(&headers, 10));
        headers.insert("content-length", HeaderValue::from_static("11"));
        assert!(exceeds_declared_length(&headers, 10));
        headers.insert("content-length", HeaderValue::from_static("abc"));
        assert!(!exceeds_declared_length(&headers, 10));
    }

    #[tokio::test]
    async fn test_read_body_limit() {
        let body = Full::new(Bytes::from_static(b"{\"action\":\"detectsyntax\"}"));
        assert!(read_body(body.clone(), 1024).await.is_some());
        assert!(read_body(body, 4).await.is_none());
    }
}
