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
use models::Book;
use service::BookService;

/// Books module: CRUD over books referencing a publisher and an author
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            service: BookService::new(store),
        }
    }

    pub fn service(&self) -> &BookService {
        &self.service
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let stored = ctx.db.count(Book::COLLECTION, &Filter::new()).await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            store = ctx.db.kind(),
            stored,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let doc = CrudDoc {
            tag: "Books",
            singular: "book",
            plural: "books",
            schema: "Book",
            create_schema: "CreateBook",
            update_schema: "UpdateBook",
            filters: &[
                ("name", "Book name"),
                ("publisher", "Publisher id"),
                ("author", "Author id"),
            ],
        };

        let properties = json!({
            "name": { "type": "string", "description": "Title of the book" },
            "publisher": { "type": "string", "description": "Publisher id" },
            "author": { "type": "string", "description": "Author id" }
        });

        let mut schemas = serde_json::Map::new();
        schemas.insert(
            "Book".into(),
            entity_schema(properties.clone(), &["name", "publisher", "author"]),
        );
        schemas.insert(
            "CreateBook".into(),
            json!({
                "type": "object",
                "required": ["name", "publisher", "author"],
                "properties": properties,
                "example": {
                    "name": "fake name",
                    "publisher": "0192f0c4-8d0e-7c5a-9f1e-3a2b1c0d9e8f",
                    "author": "0192f0c4-8d0e-7c5a-9f1e-3a2b1c0d9e90"
                }
            }),
        );
        schemas.insert(
            "UpdateBook".into(),
            json!({
                "type": "object",
                "properties": properties,
                "example": { "name": "fake name" }
            }),
        );

        Some(crud_fragment(&doc, schemas))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn DocumentStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
