use std::sync::Arc;

use compass::api::DynAPI;
use compass::config::Config;
use compass::db::{MemoryStore, PgStore, Store};
use compass::engine::Engine;
use compass::error::Error;
use compass::external::{FallbackDirections, Nominatim, OpenRouteService, Osrm};
use compass::risk::UniformRiskSource;
use compass::server::serve;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        tracing::error!("failed to start: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match &config.store.database_url {
        Some(db_uri) => Arc::new(PgStore::new(db_uri, config.store.max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL is not set, routes are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let client = reqwest::Client::new();
    let primary = OpenRouteService::new(client.clone(), &config.providers);
    if primary.is_none() {
        tracing::warn!("ORS_API_KEY is not set, using OSRM for directions");
    }

    let directions = FallbackDirections::new(primary, Osrm::new(client.clone(), &config.providers));
    let geocoder = Nominatim::new(client, &config.providers);

    let engine = Engine::new(
        store,
        Arc::new(geocoder),
        Arc::new(directions),
        Arc::new(UniformRiskSource::new()),
        config.search.clone(),
    );

    serve(Arc::new(engine) as DynAPI, &config.server).await
}
