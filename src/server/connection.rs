// Connection handling module
// Accepts one TCP connection and serves it with the pages or API service

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::api;
use crate::config;
use crate::handler;
use crate::logger;

/// Which service a listener serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Pages,
    Api,
}

impl Service {
    pub const fn log_prefix(self) -> &'static str {
        match self {
            Self::Pages => "PAGES",
            Self::Api => "API",
        }
    }
}

/// Accept a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `check_limits` - Whether to enforce `performance.max_connections`
/// * `service` - Service the connection is handed to
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<config::AppState>,
    conn_counter: &Arc<AtomicUsize>,
    check_limits: bool,
    service: Service,
) {
    // Increment first, then check, so concurrent accepts cannot both slip under the limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if check_limits {
        if let Some(max_conn) = state.config.performance.max_connections {
            if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                conn_counter.fetch_sub(1, Ordering::SeqCst);
                logger::log_warning(&format!(
                    "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
                ));
                drop(stream);
                return;
            }
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr, service.log_prefix());
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        service,
    );
}

/// Serve a connection in a spawned local task.
///
/// HTTP/1.1 with keep-alive when `keep_alive_timeout` is non-zero; the whole
/// connection is bounded by `max(read_timeout, write_timeout)`.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<config::AppState>,
    conn_counter: Arc<AtomicUsize>,
    service: Service,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            performance.read_timeout,
            performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move {
                    match service {
                        Service::Api => api::handle_api_request(req, state, peer_addr).await,
                        Service::Pages => handler::handle_request(req, state, peer_addr).await,
                    }
                }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "[{}] Connection from {peer_addr} timed out after {} seconds",
                    service.log_prefix(),
                    timeout_duration.as_secs(),
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
