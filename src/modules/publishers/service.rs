use std::sync::Arc;

use catalog_db::{DocumentStore, Filter, QueryOptions, QueryResult, Repository};
use catalog_http::AppError;
use garde::Validate;

use super::models::{CreatePublisher, Publisher, UpdatePublisher};

const NOT_FOUND: &str = "publisher not found";

#[derive(Clone)]
pub struct PublisherService {
    repo: Repository<Publisher>,
}

impl PublisherService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// Create a publisher
    pub async fn create_publisher(&self, body: CreatePublisher) -> Result<Publisher, AppError> {
        body.validate()?;
        let publisher = self.repo.create(&body).await?;
        tracing::info!(publisher_id = %publisher.id, "publisher created");
        Ok(publisher)
    }

    /// Query for publishers; an empty filter matches all of them
    pub async fn query_publishers(
        &self,
        filter: Filter,
        options: QueryOptions,
    ) -> Result<QueryResult<Publisher>, AppError> {
        Ok(self.repo.paginate(&filter, &options).await?)
    }

    pub async fn get_publisher_by_id(&self, id: &str) -> Result<Option<Publisher>, AppError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Update publisher by id
    pub async fn update_publisher_by_id(
        &self,
        id: &str,
        body: UpdatePublisher,
    ) -> Result<Publisher, AppError> {
        body.validate()?;
        self.repo
            .update_by_id(id, &body)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    /// Delete publisher by id, returning its last stored state
    pub async fn delete_publisher_by_id(&self, id: &str) -> Result<Publisher, AppError> {
        let publisher = self
            .repo
            .delete_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
        tracing::info!(publisher_id = %publisher.id, "publisher deleted");
        Ok(publisher)
    }
}
