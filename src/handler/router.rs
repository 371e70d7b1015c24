//! Page request dispatch module
//!
//! Entry point for page requests: method validation, then rendering the page
//! the path selects.

use crate::config::AppState;
use crate::http::{self, AccessRecord};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

const ALLOW: &str = "GET, HEAD, OPTIONS";

/// Main entry point for page requests
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let client = http::client_address(req.headers(), &peer_addr);
    let record = AccessRecord::begin("pages", &req, client);

    let response = check_http_method(req.method(), state.config.http.enable_cors)
        .unwrap_or_else(|| render_page(req.uri().path(), *req.method() == Method::HEAD, &state));

    record.finish(&response, &state.config.logging);
    Ok(response)
}

/// Check HTTP method and return early response if not GET/HEAD
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(ALLOW, enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(ALLOW))
        }
    }
}

fn render_page(path: &str, is_head: bool, state: &AppState) -> Response<Full<Bytes>> {
    match state.renderer.render_selector(path) {
        Ok(html) => http::build_html_response(html, is_head, &state.config.http),
        Err(e) => {
            logger::log_render_error(path, &e);
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::StubClient;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn request(method: Method, path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:51000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_get_entities_page() {
        let state = AppState::for_tests(StubClient::new());
        let response = handle_request(request(Method::GET, "/detect/entities"), state, peer())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Amazon Comprehend Demo | Detect Entities"));
        assert!(html.contains("\"/api\""));
    }

    #[tokio::test]
    async fn test_root_serves_sentiment() {
        let state = AppState::for_tests(StubClient::new());
        let response = handle_request(request(Method::GET, "/"), state, peer())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("| Detect Sentiment"));
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let state = AppState::for_tests(StubClient::new());
        let response = handle_request(request(Method::HEAD, "/detect/syntax"), state, peer())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let declared: usize = response.headers()["content-length"]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(declared > 0);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let state = AppState::for_tests(StubClient::new());
        let response = handle_request(request(Method::POST, "/detect/syntax"), state, peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], ALLOW);
    }

    #[tokio::test]
    async fn test_options_lists_methods() {
        let state = AppState::for_tests(StubClient::new());
        let response = handle_request(request(Method::OPTIONS, "/"), state, peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
