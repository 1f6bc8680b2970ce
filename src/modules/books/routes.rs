use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use catalog_db::QueryResult;
use catalog_http::{AppError, AppJson, AppQuery};
use garde::Validate;

use super::models::{Book, BookListQuery, CreateBook, UpdateBook};
use super::service::BookService;

pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", post(create_book).get(get_books))
        .route(
            "/{id}",
            get(get_book)
                .patch(update_book)
                .delete(delete_book),
        )
        .with_state(service)
}

async fn create_book(
    State(service): State<BookService>,
    AppJson(body): AppJson<CreateBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = service.create_book(body).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_books(
    State(service): State<BookService>,
    AppQuery(query): AppQuery<BookListQuery>,
) -> Result<Json<QueryResult<Book>>, AppError> {
    query.validate()?;
    let (filter, options) = query.into_parts();
    Ok(Json(service.query_books(filter, options).await?))
}

async fn get_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    service
        .get_book_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("book not found"))
}

async fn update_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateBook>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.update_book_by_id(&id, body).await?))
}

async fn delete_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete_book_by_id(&id).await?;
    Ok(StatusCode::OK)
}
