// API service entry
// Serves the NLP dispatcher on the API listener

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::{AppState, HttpConfig};
use crate::dispatch::Reply;
use crate::http::{self, AccessRecord};
use crate::logger;

const ALLOW: &str = "POST, OPTIONS";

/// API request handler
///
/// Any method other than OPTIONS is dispatched; only the body matters.
pub async fn handle_api_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let client = http::client_address(req.headers(), &peer_addr);
    let record = AccessRecord::begin("api", &req, client.clone());

    let response = respond(req, &state, &client).await;

    record.finish(&response, &state.config.logging);
    Ok(response)
}

async fn respond<B>(req: Request<B>, state: &AppState, client: &str) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let http_config = &state.config.http;

    // Requests that never reach the dispatcher still get their source logged
    if req.method() == Method::OPTIONS {
        logger::log_source_address(client);
        return http::build_options_response(ALLOW, http_config.enable_cors);
    }

    if http::exceeds_declared_length(req.headers(), http_config.max_body_size) {
        logger::log_source_address(client);
        return payload_too_large(http_config);
    }

    let Some(body) = http::read_body(req.into_body(), http_config.max_body_size).await else {
        logger::log_source_address(client);
        return payload_too_large(http_config);
    };

    let reply = state.dispatcher.handle(&body, Some(client)).await;
    http::build_json_response(reply.status, reply.body, http_config)
}

fn payload_too_large(http_config: &HttpConfig) -> Response<Full<Bytes>> {
    let reply = Reply::envelope(
        StatusCode::PAYLOAD_TOO_LARGE,
        format!("Request body exceeds {} bytes", http_config.max_body_size),
    );
    http::build_json_response(reply.status, reply.body, http_config)
}
