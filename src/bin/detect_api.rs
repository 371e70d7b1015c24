//! API Gateway proxy handler for the NLP dispatcher.
//!
//! Expects the Lambda proxy-event protocol; the request body is handed to the
//! same `Dispatcher` the long-running server uses.

use lambda_http::request::RequestContext;
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use std::sync::Arc;

use comprehend_demo::config::{AppState, Config};
use comprehend_demo::logger;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;
    let state = Arc::new(AppState::new(&cfg)?);

    // Open the client at cold start so warm invocations reuse it
    state.dispatcher.client().get().await;

    let ref_state = &state;
    run(service_fn(|req: Request| async move {
        let source_ip = source_ip(&req);
        let reply = ref_state
            .dispatcher
            .handle(req.body().as_ref(), source_ip.as_deref())
            .await;

        let mut builder = Response::builder()
            .status(reply.status)
            .header("Content-Type", "application/json");
        if ref_state.config.http.enable_cors {
            builder = builder.header("Access-Control-Allow-Origin", "*");
        }
        builder
            .body(Body::from(reply.body))
            .map_err(Error::from)
    }))
    .await
}

/// Caller address reported by API Gateway
fn source_ip(req: &Request) -> Option<String> {
    match req.request_context_ref()? {
        RequestContext::ApiGatewayV1(ctx) => ctx.identity.source_ip.clone(),
        RequestContext::ApiGatewayV2(ctx) => ctx.http.source_ip.clone(),
        _ => None,
    }
}
