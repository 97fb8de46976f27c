//! Listener setup and serving
//!
//! The primary port falls back to a second port when it is already taken, so
//! a stale instance (or another dev server) does not block startup.

use axum::Router;
use std::future::{Future, IntoFuture};
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::error::ServerError;

/// How long in-flight responses may run on after a shutdown signal
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Bind `addr:port`, retrying once on `fallback` if the port is in use
///
/// Errors other than "address in use" are returned without trying the
/// fallback.
pub async fn bind_with_fallback(
    addr: IpAddr,
    port: u16,
    fallback: Option<u16>,
) -> Result<TcpListener, ServerError> {
    match TcpListener::bind(SocketAddr::new(addr, port)).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            let Some(fallback) = fallback.filter(|f| *f != port) else {
                return Err(ServerError::Bind { port, source: e });
            };

            warn!(
                "Port {} is in use. Trying fallback port {}...",
                port, fallback
            );

            match TcpListener::bind(SocketAddr::new(addr, fallback)).await {
                Ok(listener) => Ok(listener),
                Err(e) if e.kind() == ErrorKind::AddrInUse => Err(ServerError::PortsInUse {
                    primary: port,
                    fallback,
                }),
                Err(e) => Err(ServerError::Bind {
                    port: fallback,
                    source: e,
                }),
            }
        }
        Err(e) => Err(ServerError::Bind { port, source: e }),
    }
}

/// Serve `app` until Ctrl+C or SIGTERM
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    serve_until(listener, app, shutdown_signal(), SHUTDOWN_GRACE).await
}

/// Serve `app` until `signal` resolves, then drain for at most `grace`
///
/// Audio relays stay open for a whole surah, so connections still open when
/// the grace period ends are dropped rather than awaited.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = stop_rx.wait_for(|stop| *stop).await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = signal => {
            let _ = stop_tx.send(true);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result?,
                Err(_) => warn!(
                    "Connections still open after {}s grace period, closing them",
                    grace.as_secs_f32()
                ),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
