mod api;
mod catalog_cache;
mod middleware;

use std::time::Duration;

use scentmap_curator::{BatchOptions, CuratorError, GeminiClient};
use scentmap_payments::{PaymentError, TossClient};
use scentmap_store::FirestoreClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    catalog_cache::CatalogCache,
    middleware::AuthState,
};

const CATALOG_REFRESH: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = scentmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = FirestoreClient::new(&config.firestore, config.http_timeout_secs)?;

    let gemini = match GeminiClient::new(&config.gemini) {
        Ok(client) => Some(client),
        Err(CuratorError::NotConfigured) => {
            tracing::warn!("GEMINI_API_KEY not set; AI routes will report not_configured");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let toss = match TossClient::new(&config.toss, config.http_timeout_secs) {
        Ok(client) => Some(client),
        Err(PaymentError::NotConfigured) => {
            tracing::warn!("TOSS_PAYMENTS_SECRET_KEY not set; payment confirmation disabled");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let state = AppState {
        catalog: CatalogCache::new(store.clone(), CATALOG_REFRESH),
        store,
        gemini,
        toss,
        batch: BatchOptions::from_settings(&config.gemini),
    };

    let auth = AuthState::from_env(matches!(
        config.env,
        scentmap_core::Environment::Development
    ))?;
    let app = build_app(state, auth, default_rate_limit_state());

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting scentmap server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
