use std::sync::Arc;

use catalog_db::{DocumentStore, Filter, QueryOptions, QueryResult, Repository};
use catalog_http::AppError;
use garde::Validate;
use serde_json::json;

use super::models::{Book, CreateBook, UpdateBook};

const NOT_FOUND: &str = "book not found";

#[derive(Clone)]
pub struct BookService {
    repo: Repository<Book>,
}

impl BookService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// References must look like store identifiers; existence is not checked.
    fn check_reference(&self, field: &str, id: &str) -> Result<(), AppError> {
        self.repo.validate_id(id).map_err(|_| {
            AppError::validation(
                vec![json!({ "field": field, "error": "not a valid identifier" })],
                format!("{} must be a valid identifier", field),
            )
        })
    }

    /// Create a book
    pub async fn create_book(&self, body: CreateBook) -> Result<Book, AppError> {
        body.validate()?;
        self.check_reference("publisher", &body.publisher)?;
        self.check_reference("author", &body.author)?;

        let book = self.repo.create(&body).await?;
        tracing::info!(
            book_id = %book.id,
            publisher_id = %book.publisher,
            author_id = %book.author,
            "book created"
        );
        Ok(book)
    }

    /// Query for books
    pub async fn query_books(
        &self,
        filter: Filter,
        options: QueryOptions,
    ) -> Result<QueryResult<Book>, AppError> {
        Ok(self.repo.paginate(&filter, &options).await?)
    }

    /// Get book by id; `None` when absent
    pub async fn get_book_by_id(&self, id: &str) -> Result<Option<Book>, AppError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Update book by id
    pub async fn update_book_by_id(&self, id: &str, body: UpdateBook) -> Result<Book, AppError> {
        body.validate()?;
        if let Some(publisher) = &body.publisher {
            self.check_reference("publisher", publisher)?;
        }
        if let Some(author) = &body.author {
            self.check_reference("author", author)?;
        }

        self.repo
            .update_by_id(id, &body)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    /// Delete book by id
    pub async fn delete_book_by_id(&self, id: &str) -> Result<Book, AppError> {
        let book = self
            .repo
            .delete_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
        tracing::info!(book_id = %book.id, "book deleted");
        Ok(book)
    }
}
