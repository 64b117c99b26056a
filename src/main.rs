// backend/src/main.rs

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    config::Config,
    db::{memory::MemoryStore, postgres::PgStore},
    flightaware::FlightAwareClient,
    store::{FlightSource, FlightStore, SettingsStore},
};

mod billing;
mod config;
mod db;
mod error;
mod flightaware;
mod models;
mod refresh;
mod routes;
mod store;
mod summary;

#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<dyn FlightStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub source: Option<Arc<dyn FlightSource>>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let (flights, settings): (Arc<dyn FlightStore>, Arc<dyn SettingsStore>) =
        match &config.database_url {
            Some(url) => {
                let pool = db::connect(url, config.database_max_connections).await?;
                let store = Arc::new(PgStore::new(pool));
                (store.clone() as Arc<dyn FlightStore>, store as Arc<dyn SettingsStore>)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, keeping flights in memory");
                let store = Arc::new(MemoryStore::default());
                (store.clone() as Arc<dyn FlightStore>, store as Arc<dyn SettingsStore>)
            }
        };

    let source: Option<Arc<dyn FlightSource>> = match FlightAwareClient::from_config(&config.flightaware)? {
        Some(client) => Some(Arc::new(client) as Arc<dyn FlightSource>),
        None => {
            tracing::warn!("FLIGHTAWARE_API_KEY not set, refresh is disabled");
            None
        }
    };

    let port = config.port;
    let state = AppState {
        flights,
        settings,
        source,
        config: Arc::new(config),
    };
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "AirLogger API listening");

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
