use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use catalog_db::QueryResult;
use catalog_http::{AppError, AppJson, AppQuery};
use garde::Validate;

use super::models::{CreatePublisher, Publisher, PublisherListQuery, UpdatePublisher};
use super::service::PublisherService;

pub fn router(service: PublisherService) -> Router {
    Router::new()
        .route("/", post(create_publisher).get(get_publishers))
        .route(
            "/{id}",
            get(get_publisher)
                .patch(update_publisher)
                .delete(delete_publisher),
        )
        .with_state(service)
}

async fn create_publisher(
    State(service): State<PublisherService>,
    AppJson(body): AppJson<CreatePublisher>,
) -> Result<(StatusCode, Json<Publisher>), AppError> {
    let publisher = service.create_publisher(body).await?;
    Ok((StatusCode::CREATED, Json(publisher)))
}

async fn get_publishers(
    State(service): State<PublisherService>,
    AppQuery(query): AppQuery<PublisherListQuery>,
) -> Result<Json<QueryResult<Publisher>>, AppError> {
    query.validate()?;
    let (filter, options) = query.into_parts();
    Ok(Json(service.query_publishers(filter, options).await?))
}

async fn get_publisher(
    State(service): State<PublisherService>,
    Path(id): Path<String>,
) -> Result<Json<Publisher>, AppError> {
    service
        .get_publisher_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("publisher not found"))
}

async fn update_publisher(
    State(service): State<PublisherService>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdatePublisher>,
) -> Result<Json<Publisher>, AppError> {
    Ok(Json(service.update_publisher_by_id(&id, body).await?))
}

async fn delete_publisher(
    State(service): State<PublisherService>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete_publisher_by_id(&id).await?;
    Ok(StatusCode::OK)
}
