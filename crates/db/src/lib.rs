//! Document store abstraction for the catalog service.
//!
//! A [`DocumentStore`] is the only thing that touches storage. Entity
//! behaviour (timestamps, pagination, public JSON shaping) is layered on top
//! by [`Repository`], so services never reach for a global model registry.

use std::sync::Arc;

pub mod error;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod paginate;
pub mod repository;
pub mod store;
pub mod to_json;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use paginate::{QueryOptions, QueryResult};
pub use repository::{Repository, Schema};
pub use store::{Document, DocumentStore, Filter, FindOptions, Sort, SortOrder};

pub const MEMORY_ENDPOINT: &str = "memory://";

/// Open the store named by `endpoint`: `memory://` or, with the `mongodb`
/// feature, a `mongodb://` / `mongodb+srv://` URI.
#[cfg_attr(not(feature = "mongodb"), allow(unused_variables))]
pub async fn connect(endpoint: &str, database: &str) -> StoreResult<Arc<dyn DocumentStore>> {
    if endpoint.starts_with(MEMORY_ENDPOINT) {
        tracing::info!(target: "catalog-db", "using in-memory document store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    #[cfg(feature = "mongodb")]
    if endpoint.starts_with("mongodb://") || endpoint.starts_with("mongodb+srv://") {
        let store = mongo::MongoStore::connect(endpoint, database).await?;
        store.ping().await?;
        tracing::info!(target: "catalog-db", database, "connected to MongoDB");
        return Ok(Arc::new(store));
    }

    Err(StoreError::UnsupportedEndpoint(endpoint.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connects_to_memory_store() {
        let store = connect("memory://", "catalog").await.unwrap();
        assert_eq!(store.kind(), "memory");
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn rejects_unknown_endpoints() {
        let err = match connect("redis://localhost", "catalog").await {
            Err(err) => err,
            Ok(_) => panic!("expected an unsupported endpoint"),
        };
        assert!(matches!(err, StoreError::UnsupportedEndpoint(_)));
    }
}
