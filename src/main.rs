use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use comprehend_demo::config::{AppState, Config};
use comprehend_demo::logger;
use comprehend_demo::server::{
    create_reusable_listener, start_server_loop, start_signal_handler, ServerLoopConfig, Service,
    SignalHandler,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Build the runtime by hand so `server.workers` can size it
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let app_addr = cfg.get_socket_addr()?;
    let api_addr = cfg.get_api_socket_addr()?;

    let app_listener = create_reusable_listener(app_addr)?;
    let api_listener = create_reusable_listener(api_addr)?;

    let state = Arc::new(AppState::new(&cfg)?);
    let signals = Arc::new(SignalHandler::new());
    start_signal_handler(Arc::clone(&signals))?;

    logger::log_server_start(&app_addr, &api_addr, &cfg);

    // spawn_local is used per connection, so both loops run inside a LocalSet
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            let api = tokio::task::spawn_local(start_server_loop(
                api_listener,
                Arc::clone(&state),
                Arc::new(AtomicUsize::new(0)),
                ServerLoopConfig {
                    service: Service::Api,
                    check_connection_limits: false,
                    signals: Arc::clone(&signals),
                },
            ));

            start_server_loop(
                app_listener,
                state,
                Arc::new(AtomicUsize::new(0)),
                ServerLoopConfig {
                    service: Service::Pages,
                    check_connection_limits: true,
                    signals,
                },
            )
            .await;

            if let Err(e) = api.await {
                logger::log_error(&format!("API server task failed: {e}"));
            }
        })
        .await;

    logger::log_info("Server stopped");
    Ok(())
}
