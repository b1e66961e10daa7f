//! Collection (catalog) endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::collection::{Collection, CollectionInput, ResizeCollection},
    AppState,
};

use super::{ApiJson, ApiPath};

/// Plain acknowledgement
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Acknowledgement for a created collection
#[derive(Serialize, ToSchema)]
pub struct CollectionCreatedResponse {
    pub message: String,
    /// ID of the new collection
    pub id: i32,
}

/// List all collections
#[utoipa::path(
    get,
    path = "/collections",
    tag = "collections",
    responses(
        (status = 200, description = "All collections", body = Vec<Collection>),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_collections(State(state): State<AppState>) -> AppResult<Json<Vec<Collection>>> {
    let collections = state.services.catalog.list_collections().await?;
    Ok(Json(collections))
}

/// Get collection by ID
#[utoipa::path(
    get,
    path = "/collections/{id}",
    tag = "collections",
    params(("id" = i32, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Collection", body = Collection),
        (status = 404, description = "Collection not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_collection(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Collection>> {
    let collection = state.services.catalog.get_collection(id).await?;
    Ok(Json(collection))
}

/// Add a collection
#[utoipa::path(
    post,
    path = "/collections",
    tag = "collections",
    request_body = CollectionInput,
    responses(
        (status = 200, description = "Collection added", body = CollectionCreatedResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_collection(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CollectionInput>,
) -> AppResult<Json<CollectionCreatedResponse>> {
    data.validate()?;
    let collection = state.services.catalog.add_collection(&data).await?;
    Ok(Json(CollectionCreatedResponse {
        message: "Book added".to_string(),
        id: collection.id,
    }))
}

/// Update title, author and total copies (available copies unchanged)
#[utoipa::path(
    put,
    path = "/collections/{id}",
    tag = "collections",
    params(("id" = i32, Path, description = "Collection ID")),
    request_body = CollectionInput,
    responses(
        (status = 200, description = "Collection updated", body = Collection),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Collection not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_collection(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(data): ApiJson<CollectionInput>,
) -> AppResult<Json<Collection>> {
    data.validate()?;
    let collection = state.services.catalog.update_collection(id, &data).await?;
    Ok(Json(collection))
}

/// Change owned copies and shift available copies by the same amount
#[utoipa::path(
    put,
    path = "/collections/{id}/copies",
    tag = "collections",
    params(("id" = i32, Path, description = "Collection ID")),
    request_body = ResizeCollection,
    responses(
        (status = 200, description = "Collection resized", body = Collection),
        (status = 404, description = "Collection not found", body = crate::error::ErrorResponse),
        (status = 409, description = "More copies on loan than the new total", body = crate::error::ErrorResponse)
    )
)]
pub async fn resize_collection(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(data): ApiJson<ResizeCollection>,
) -> AppResult<Json<Collection>> {
    data.validate()?;
    let collection = state
        .services
        .catalog
        .resize_collection(id, data.total_copies)
        .await?;
    Ok(Json(collection))
}

/// Delete a collection
#[utoipa::path(
    delete,
    path = "/collections/{id}",
    tag = "collections",
    params(("id" = i32, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Collection deleted", body = MessageResponse),
        (status = 404, description = "Collection not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Collection still has loans", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_collection(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.delete_collection(id).await?;
    Ok(Json(MessageResponse {
        message: "Book deleted".to_string(),
    }))
}
