use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

use bacheca_server::{
    init_schema, logging, routes, wait_for_db, AppState, Config, Connectivity, Store,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env opzionale, come in sviluppo locale
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("load configuration")?;
    logging::init_tracing(&config.log_level)?;
    tracing::info!(database = ?config.database, retry = ?config.retry, "configuration loaded");

    let db_url = config.database.url()?;
    let store = Store::connect_lazy(&db_url, &config.pool).context("create database pool")?;

    // Nessuna richiesta viene servita finché il database non risponde.
    match wait_for_db(&config.retry, || store.probe()).await {
        Connectivity::Established { .. } => {}
        state => {
            tracing::error!(
                attempts = state.attempts(),
                "could not connect to database, shutting down"
            );
            anyhow::bail!("database unreachable after {} attempts", state.attempts());
        }
    }

    init_schema(&store).await.context("initialize database schema")?;

    let state = Arc::new(AppState::new(store));
    let app = routes::router(state);

    let addr: SocketAddr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind tcp listener")?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server shutdown")?;

    Ok(())
}
