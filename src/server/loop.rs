// Server loop module
// Main accept loop with graceful shutdown

use std::future::Future;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase polls the active connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` resolves, then drain.
///
/// Once the shutdown future completes the listener is dropped so no new
/// connections are accepted. In-flight connections get up to the
/// configured connection timeout to finish before the loop returns.
pub async fn start_server_loop<S>(
    listener: TcpListener,
    state: Rc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: S,
) where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_shutdown_requested(active_connections.load(Ordering::SeqCst));

    let grace = state.config.connection_timeout();
    if !drain_connections(&active_connections, grace).await {
        logger::log_warning(&format!(
            "{} connection(s) still open after {} seconds, closing anyway",
            active_connections.load(Ordering::SeqCst),
            grace.as_secs()
        ));
    }

    logger::log_shutdown_complete();
}

/// Wait for the active counter to reach zero.
///
/// Returns `false` if `grace` elapsed first.
pub async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + grace;

    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
    true
}
