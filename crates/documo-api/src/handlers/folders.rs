use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use documo_core::models::{Folder, FolderResponse};
use documo_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFolderPayload {
    pub name: String,
    #[serde(default)]
    pub requested_type_ids: Vec<String>,
}

/// Create a new folder
#[utoipa::path(
    post,
    path = "/api/v0/folders",
    tag = "folders",
    request_body = CreateFolderPayload,
    responses(
        (status = 201, description = "Folder created successfully", body = FolderResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, payload))]
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFolderPayload>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(HttpAppError(AppError::BadRequest(
            "Folder name cannot be empty".to_string(),
        )));
    }
    if name.len() > 255 {
        return Err(HttpAppError(AppError::BadRequest(
            "Folder name cannot exceed 255 characters".to_string(),
        )));
    }

    for type_id in &payload.requested_type_ids {
        if state.document_types.get(type_id).await?.is_none() {
            return Err(HttpAppError(AppError::NotFound(format!(
                "Unknown document type '{}'",
                type_id
            ))));
        }
    }

    let now = Utc::now();
    let folder = Folder {
        id: Uuid::new_v4(),
        name: name.to_string(),
        requested_type_ids: payload.requested_type_ids,
        completed_at: None,
        created_at: now,
        updated_at: now,
    };
    state.folders.insert(&folder).await?;

    Ok((StatusCode::CREATED, Json(FolderResponse::from(folder))))
}

/// Get folder by ID
#[utoipa::path(
    get,
    path = "/api/v0/folders/{id}",
    tag = "folders",
    params(
        ("id" = Uuid, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Folder found", body = FolderResponse),
        (status = 404, description = "Folder not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let folder = state
        .folders
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;

    Ok(Json(FolderResponse::from(folder)))
}
