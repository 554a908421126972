pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;
pub(crate) mod store;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::services::storage::{BlobStore, S3BlobStore};
use crate::store::dynamo::DynamoStore;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let store = Arc::new(DynamoStore::from_settings(&settings).await);
    let storage = S3BlobStore::from_settings(&settings).await?;
    if storage.is_none() {
        tracing::warn!("S3 credentials missing; upload URLs will be unavailable");
    }

    let state = AppState::new(
        settings,
        store,
        storage.map(|blob| Arc::new(blob) as Arc<dyn BlobStore>),
    );

    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server().host,
        port = state.settings().server().port,
        "Minimoodle Rust API listening"
    );

    axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await?;

    Ok(())
}
