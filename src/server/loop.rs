// Server loop module
// Accepts connections until a shutdown is requested

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop
///
/// Must run inside a `LocalSet`: connections are served with
/// `spawn_local`. Returns once `shutdown` is notified; connections already
/// being served are left to finish on the `LocalSet`.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
            _ = shutdown.notified() => {
                logger::log_info("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    logger::log_server_stopped();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::default_config;
    use crate::server::create_reusable_listener;
    use std::time::Duration;

    #[tokio::test]
    async fn test_loop_exits_on_shutdown() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let state = Arc::new(AppState::new(&default_config()));
        let shutdown = Arc::new(Notify::new());

        // notify_one stores a permit, so the loop sees it even if it starts later
        shutdown.notify_one();

        let local = tokio::task::LocalSet::new();
        let finished = local
            .run_until(tokio::time::timeout(
                Duration::from_secs(5),
                run_server(listener, state, Arc::new(AtomicUsize::new(0)), shutdown),
            ))
            .await;
        assert!(finished.is_ok());
    }
}
