//! API Gateway proxy handler for the demo pages.

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

    let ref_state = &state;
    run(service_fn(|req: Request| async move {
        let path = page_path(&req);
        let response = match ref_state.renderer.render_selector(&path) {
            Ok(html) => Response::builder()
                .status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body(Body::from(html)),
            Err(e) => {
                logger::log_render_error(&path, &e);
                Response::builder()
                    .status(500)
                    .header("Content-Type", "text/plain")
                    .body(Body::from("500 Internal Server Error"))
            }
        };
        response.map_err(Error::from)
    }))
    .await
}

/// REST APIs report the matched resource, which carries no stage prefix
fn page_path(req: &Request) -> String {
    match req.request_context_ref() {
        Some(RequestContext::ApiGatewayV1(ctx)) => ctx
            .resource_path
            .clone()
            .unwrap_or_else(|| req.raw_http_path().to_string()),
        _ => req.raw_http_path().to_string(),
    }
}
