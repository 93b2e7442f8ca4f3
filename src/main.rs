use std::rc::Rc;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use restkit::catalog::{self, ProductCatalog};
use restkit::config::{AppState, Config};
use restkit::logger;
use restkit::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Handlers are not Send, so everything runs on one thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let local = tokio::task::LocalSet::new();
    runtime.block_on(local.run_until(async_main(cfg)))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr, cfg.server.backlog)?;

    let router = catalog::router(ProductCatalog::new());

    logger::log_server_start(&addr, &cfg);
    for route in router.routes() {
        logger::log_route(route.method().as_str(), route.pattern(), route.operation());
    }

    let state = Rc::new(AppState::new(cfg, router));
    let active_connections = Arc::new(AtomicUsize::new(0));

    server::start_server_loop(listener, state, active_connections, server::shutdown_signal()).await;
    Ok(())
}
