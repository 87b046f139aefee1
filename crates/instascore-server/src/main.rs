mod api;
mod middleware;

use std::sync::Arc;

use instascore_core::ScoreWeights;
use instascore_db::PgStore;
use instascore_pipeline::{RandomDelay, StaticRankings};
use instascore_scraper::{ClientConfig, InstagramClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::{AuthState, RateLimiter},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = instascore_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = instascore_db::PoolConfig::from_app_config(&config);
    let pool = instascore_db::connect_pool(config.require_database_url()?, pool_config).await?;
    let applied = instascore_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let client = InstagramClient::new(ClientConfig::from_app_config(&config))?;
    let rankings = StaticRankings::from_file(&config.accounts_path)?;
    tracing::info!(
        accounts = rankings.len(),
        path = %config.accounts_path.display(),
        "loaded ranked accounts"
    );

    let store = Arc::new(PgStore::new(pool));
    let state = AppState {
        source: Arc::new(client),
        rankings: Arc::new(rankings),
        throttle: Arc::new(RandomDelay::from_app_config(&config)),
        profiles: store.clone(),
        leaderboards: store.clone(),
        health: store,
        weights: ScoreWeights::default(),
        leaderboard_size: config.leaderboard_size,
        leaderboard_batch_size: config.leaderboard_batch_size,
    };

    let auth = AuthState::from_config(&config)?;
    let limiter = RateLimiter::per_minute(config.rate_limit_per_minute);
    let app = build_app(state, auth, limiter);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "instascore-server listening");
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
