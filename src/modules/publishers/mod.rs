pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use catalog_db::{DocumentStore, Filter, Schema};
use catalog_kernel::{InitCtx, Module};
use serde_json::json;

use crate::utils::openapi::{crud_fragment, entity_schema, CrudDoc};
use models::Publisher;
use service::PublisherService;

/// Publisher management and retrieval
pub struct PublishersModule {
    service: PublisherService,
}

impl PublishersModule {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            service: PublisherService::new(store),
        }
    }

    pub fn service(&self) -> &PublisherService {
        &self.service
    }
}

#[async_trait]
impl Module for PublishersModule {
    fn name(&self) -> &'static str {
        "publishers"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let stored = ctx.db.count(Publisher::COLLECTION, &Filter::new()).await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            store = ctx.db.kind(),
            stored,
            "publishers module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let doc = CrudDoc {
            tag: "Publishers",
            singular: "publisher",
            plural: "publishers",
            schema: "Publisher",
            create_schema: "CreatePublisher",
            update_schema: "UpdatePublisher",
            filters: &[("name", "publisher name")],
        };

        let mut schemas = serde_json::Map::new();
        schemas.insert(
            "Publisher".into(),
            entity_schema(json!({ "name": { "type": "string" } }), &["name"]),
        );
        schemas.insert(
            "CreatePublisher".into(),
            json!({
                "type": "object",
                "required": ["name"],
                "properties": { "name": { "type": "string", "minLength": 1 } },
                "example": { "name": "fake name" }
            }),
        );
        schemas.insert(
            "UpdatePublisher".into(),
            json!({
                "type": "object",
                "properties": { "name": { "type": "string", "minLength": 1 } },
                "example": { "name": "fake name" }
            }),
        );

        Some(crud_fragment(&doc, schemas))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "publishers module stopped");
        Ok(())
    }
}

/// Create a new instance of the publishers module
pub fn create_module(store: Arc<dyn DocumentStore>) -> Arc<dyn Module> {
    Arc::new(PublishersModule::new(store))
}
