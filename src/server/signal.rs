// Signal handling module
//
// SIGTERM and SIGINT (Ctrl+C) request a graceful shutdown: the accept
// loop stops and the process exits.

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Register shutdown signals and notify `shutdown` when one arrives
///
/// Registration happens before this returns, so a failure to install a
/// handler surfaces as an error at startup.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    logger::log_info(&format!(
        "Signal handlers registered (SIGTERM, SIGINT), pid {}",
        std::process::id()
    ));

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        logger::log_info(&format!("{name} received, initiating graceful shutdown"));
        shutdown.notify_one();
    });

    Ok(())
}

/// Non-unix fallback, only Ctrl+C is handled
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                logger::log_info("Ctrl+C received, initiating graceful shutdown");
                shutdown.notify_one();
            }
            Err(e) => logger::log_error(&format!("Failed to listen for Ctrl+C: {e}")),
        }
    });

    Ok(())
}
