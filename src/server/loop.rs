// Server loop module
// Accept loop shared by the pages and API listeners, with graceful shutdown

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::{accept_connection, Service};
use super::signal::SignalHandler;
use crate::config;
use crate::logger;

const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Configuration for server loop behavior
pub struct ServerLoopConfig {
    pub service: Service,
    pub check_connection_limits: bool,
    pub signals: Arc<SignalHandler>,
}

/// Accept connections until shutdown is requested, then wait for in-flight
/// connections to finish (bounded by the connection timeout).
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    config: ServerLoopConfig,
) {
    let prefix = config.service.log_prefix();

    while !config.signals.is_shutdown_requested() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            config.check_connection_limits,
                            config.service,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("[{prefix}] Failed to accept connection: {e}"));
                    }
                }
            }

            () = config.signals.wait_for_shutdown() => {}
        }
    }

    logger::log_shutdown(prefix);
    drop(listener);

    let performance = &state.config.performance;
    let grace = Duration::from_secs(performance.read_timeout.max(performance.write_timeout));
    drain_connections(&active_connections, grace, prefix).await;
}

/// Wait until no connection is active or `grace` has elapsed
async fn drain_connections(active_connections: &AtomicUsize, grace: Duration, prefix: &str) {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 {
            logger::log_info(&format!("[{prefix}] All connections closed"));
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "[{prefix}] {remaining} connection(s) still open after {} seconds, closing",
                grace.as_secs()
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::StubClient;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let counter = AtomicUsize::new(0);
        tokio::time::timeout(
            Duration::from_secs(1),
            drain_connections(&counter, Duration::from_secs(30), "TEST"),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let counter = AtomicUsize::new(1);
        drain_connections(&counter, Duration::from_millis(10), "TEST").await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_serves_api_then_shuts_down() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
                let addr = listener.local_addr().unwrap();
                let signals = Arc::new(SignalHandler::new());

                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    config::AppState::for_tests(StubClient::new()),
                    Arc::new(AtomicUsize::new(0)),
                    ServerLoopConfig {
                        service: Service::Api,
                        check_connection_limits: false,
                        signals: Arc::clone(&signals),
                    },
                ));

                let body = r#"{"action":"detectsentiment","message":"great"}"#;
                let request = format!(
                    "POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
                stream.write_all(request.as_bytes()).await.unwrap();
                let mut response = String::new();
                stream.read_to_string(&mut response).await.unwrap();

                assert!(response.starts_with("HTTP/1.1 200"));
                assert!(response.ends_with(r#"{"message":"POSITIVE"}"#));

                signals.request_shutdown();
                tokio::time::timeout(Duration::from_secs(5), server)
                    .await
                    .unwrap()
                    .unwrap();
            })
            .await;
    }
}
