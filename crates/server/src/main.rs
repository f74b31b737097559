mod config;
mod http;
mod state;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use adapter::FreshdeskClient;
use crate::config::Settings;
use http::router::build_router;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::new()?;
    info!(
        "Relaying to {} (parent field '{}')",
        settings.freshdesk_client_config().base_url,
        settings.freshdesk.parent_field
    );

    let client = FreshdeskClient::new(settings.freshdesk_client_config())
        .context("Failed to build Freshdesk client")?;

    let state = AppState::new(Arc::new(client), &settings.freshdesk.parent_field);
    let app = build_router(state);

    let addr = settings.bind_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C, or on SIGTERM from the process supervisor.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C listener failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM listener unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = first_signal(ctrl_c, terminate).await;
    info!(signal, "Draining in-flight webhooks before exit");
}

async fn first_signal(
    ctrl_c: impl std::future::Future<Output = ()>,
    terminate: impl std::future::Future<Output = ()>,
) -> &'static str {
    tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    }
}

#[cfg(test)]
mod tests {
    use super::first_signal;
    use std::future::{pending, ready};

    #[tokio::test]
    async fn test_first_signal_names_whichever_fired() {
        assert_eq!(first_signal(ready(()), pending()).await, "Ctrl+C");
        assert_eq!(first_signal(pending(), ready(())).await, "SIGTERM");
    }
}
