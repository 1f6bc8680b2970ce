use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use catalog_db::QueryResult;
use catalog_http::{AppError, AppJson, AppQuery};
use garde::Validate;

use super::models::{Author, AuthorListQuery, CreateAuthor, UpdateAuthor};
use super::service::AuthorService;

pub fn router(service: AuthorService) -> Router {
    Router::new()
        .route("/", post(create_author).get(get_authors))
        .route(
            "/{id}",
            get(get_author)
                .patch(update_author)
                .delete(delete_author),
        )
        .with_state(service)
}

async fn create_author(
    State(service): State<AuthorService>,
    AppJson(body): AppJson<CreateAuthor>,
) -> Result<(StatusCode, Json<Author>), AppError> {
    let author = service.create_author(body).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

async fn get_authors(
    State(service): State<AuthorService>,
    AppQuery(query): AppQuery<AuthorListQuery>,
) -> Result<Json<QueryResult<Author>>, AppError> {
    query.validate()?;
    let (filter, options) = query.into_parts();
    Ok(Json(service.query_authors(filter, options).await?))
}

async fn get_author(
    State(service): State<AuthorService>,
    Path(id): Path<String>,
) -> Result<Json<Author>, AppError> {
    service
        .get_author_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("author not found"))
}

async fn update_author(
    State(service): State<AuthorService>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateAuthor>,
) -> Result<Json<Author>, AppError> {
    Ok(Json(service.update_author_by_id(&id, body).await?))
}

async fn delete_author(
    State(service): State<AuthorService>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete_author_by_id(&id).await?;
    Ok(StatusCode::OK)
}
