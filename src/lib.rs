//! Library catalog application
//!
//! Books, authors, and publishers exposed as CRUD modules over a shared
//! document store.

use std::sync::Arc;

use anyhow::Context;
use catalog_db::DocumentStore;
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;
pub mod utils;

/// Build a registry holding every catalog module bound to `store`
pub fn build_registry(store: Arc<dyn DocumentStore>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Connect the store, run the module lifecycle, and serve HTTP until Ctrl-C
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = catalog_db::connect(&settings.database.endpoint, &settings.database.database)
        .await
        .context("failed to connect to the document store")?;

    let registry = build_registry(Arc::clone(&store));
    let ctx = InitCtx {
        settings: &settings,
        db: &store,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = catalog_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.stop_modules().await?;
    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
