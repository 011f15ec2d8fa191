//! GestorBot Web is the web front end of GestorBot, an expense and revenue
//! tracker for small businesses.
//!
//! This library serves the HTML pages: receipt upload and review, the monthly
//! dashboard and the annual analysis. Receipt extraction, storage and totals
//! live in the GestorBot backend, which is reached through [GestorApi].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod annual;
mod api;
mod app_state;
mod category;
mod charts;
mod classification;
mod dashboard;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod period;
mod preferences;
mod routing;
mod timezone;
mod upload;

#[cfg(test)]
mod test_utils;

pub use api::{ApiError, GestorApi, HttpGestorApi};
pub use app_state::AppState;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::{MAX_UPLOAD_BODY_SIZE, build_router};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
