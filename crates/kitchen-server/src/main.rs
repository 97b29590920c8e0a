//! Kitchen ticket server

use eyre::Result;
use kitchen_server::ServerSettings;
use kitchen_service::{InMemoryKitchenStore, KitchenServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .init();

    let settings = ServerSettings::load()?;
    let server = kitchen_server::bind(&settings)?;
    let handler = KitchenServer::new(InMemoryKitchenStore::new());

    kitchen_server::serve(&server, &handler, settings.worker_threads)
}
