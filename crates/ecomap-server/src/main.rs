mod api;
mod middleware;

use ecomap_core::MountGuard;
use ecomap_overpass::PointLoader;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limiter, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ecomap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let loader = PointLoader::from_config(&config)?;
    let mount = MountGuard::new();
    let Some(loaded) = loader.load(&mount).await else {
        anyhow::bail!("shut down before locations finished loading");
    };
    tracing::info!(
        env = %config.env,
        source = %loaded.source,
        points = loaded.points.len(),
        "locations loaded"
    );

    let app = build_app(AppState::from_loaded(loaded), default_rate_limiter());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    mount.unmount();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
