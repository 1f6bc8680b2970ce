use std::sync::Arc;

use catalog_db::{DocumentStore, Filter, QueryOptions, QueryResult, Repository};
use catalog_http::AppError;
use garde::Validate;

use super::models::{Author, CreateAuthor, UpdateAuthor};

const NOT_FOUND: &str = "author not found";

#[derive(Clone)]
pub struct AuthorService {
    repo: Repository<Author>,
}

impl AuthorService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// Create an author
    pub async fn create_author(&self, body: CreateAuthor) -> Result<Author, AppError> {
        body.validate()?;
        let author = self.repo.create(&body).await?;
        tracing::info!(author_id = %author.id, "author created");
        Ok(author)
    }

    /// Paginated author listing
    pub async fn query_authors(
        &self,
        filter: Filter,
        options: QueryOptions,
    ) -> Result<QueryResult<Author>, AppError> {
        Ok(self.repo.paginate(&filter, &options).await?)
    }

    pub async fn get_author_by_id(&self, id: &str) -> Result<Option<Author>, AppError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Shallow-merges `body` over the stored author
    pub async fn update_author_by_id(
        &self,
        id: &str,
        body: UpdateAuthor,
    ) -> Result<Author, AppError> {
        body.validate()?;
        self.repo
            .update_by_id(id, &body)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    pub async fn delete_author_by_id(&self, id: &str) -> Result<Author, AppError> {
        let author = self
            .repo
            .delete_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
        tracing::info!(author_id = %author.id, "author deleted");
        Ok(author)
    }
}
