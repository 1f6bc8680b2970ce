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
use models::Author;
use service::AuthorService;

/// Author management and retrieval
pub struct AuthorsModule {
    service: AuthorService,
}

impl AuthorsModule {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            service: AuthorService::new(store),
        }
    }

    pub fn service(&self) -> &AuthorService {
        &self.service
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let stored = ctx.db.count(Author::COLLECTION, &Filter::new()).await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            store = ctx.db.kind(),
            stored,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let doc = CrudDoc {
            tag: "Authors",
            singular: "author",
            plural: "authors",
            schema: "Author",
            create_schema: "CreateAuthor",
            update_schema: "UpdateAuthor",
            filters: &[("name", "author name")],
        };

        let mut schemas = serde_json::Map::new();
        schemas.insert(
            "Author".into(),
            entity_schema(json!({ "name": { "type": "string" } }), &["name"]),
        );
        schemas.insert(
            "CreateAuthor".into(),
            json!({
                "type": "object",
                "required": ["name"],
                "properties": { "name": { "type": "string", "minLength": 1 } },
                "example": { "name": "fake name" }
            }),
        );
        schemas.insert(
            "UpdateAuthor".into(),
            json!({
                "type": "object",
                "properties": { "name": { "type": "string", "minLength": 1 } },
                "example": { "name": "fake name" }
            }),
        );

        Some(crud_fragment(&doc, schemas))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new instance of the authors module
pub fn create_module(store: Arc<dyn DocumentStore>) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(store))
}
