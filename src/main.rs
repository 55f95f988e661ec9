use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use playpal_api::{
    config::Config,
    db::{self, Cache, CacheWriterHandle, InMemoryPartyStore, PartyStore, PgPartyStore},
    routes::{create_router, AppState},
    services::providers::{PalmOracle, RawgClient, SteamCatalogClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("playpal_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let party_store = create_party_store(&config).await?;
    let (cache, cache_writer) = create_cache(&config)?.unzip();

    let state = AppState::new(
        party_store,
        Arc::new(SteamCatalogClient::new(
            config.steam_key.clone(),
            config.steam_api_url.clone(),
        )),
        Arc::new(RawgClient::new(
            config.rawg_key.clone(),
            config.rawg_api_url.clone(),
            cache,
        )),
        Arc::new(PalmOracle::new(
            config.palm_key.clone(),
            config.palm_api_url.clone(),
            config.palm_model.clone(),
        )),
        config.catalog_timeout(),
    );

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    Ok(())
}

async fn create_party_store(config: &Config) -> anyhow::Result<Arc<dyn PartyStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            tracing::info!("Using PostgreSQL party store");
            Ok(Arc::new(PgPartyStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, parties will not survive a restart");
            Ok(Arc::new(InMemoryPartyStore::new()))
        }
    }
}

fn create_cache(config: &Config) -> anyhow::Result<Option<(Cache, CacheWriterHandle)>> {
    match &config.redis_url {
        Some(url) => {
            let client = db::create_redis_client(url)?;
            tracing::info!("Search cache enabled");
            Ok(Some(Cache::new(client)))
        }
        None => {
            tracing::info!("REDIS_URL not set, search cache disabled");
            Ok(None)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
