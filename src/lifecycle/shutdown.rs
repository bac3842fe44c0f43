//! Signal handling for graceful shutdown

use tracing::{debug, warn};

/// Resolves when the host process is asked to stop (SIGTERM, SIGINT)
pub struct ShutdownSignal;

impl ShutdownSignal {
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal
    #[cfg(unix)]
    pub async fn wait(&self) {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!(?e, "SIGTERM handler unavailable, waiting for Ctrl-C only");
                Self::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                debug!("received SIGTERM");
            }
            _ = Self::ctrl_c() => {}
        }
    }

    /// Wait for a shutdown signal
    #[cfg(not(unix))]
    pub async fn wait(&self) {
        Self::ctrl_c().await;
    }

    async fn ctrl_c() {
        match tokio::signal::ctrl_c().await {
            Ok(()) => debug!("received SIGINT"),
            Err(e) => {
                warn!(?e, "Ctrl-C handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
