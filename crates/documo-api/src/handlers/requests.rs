use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use documo_core::models::{DocumentRequest, RequestResponse, ShareLink};
use documo_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequestPayload {
    #[validate(email)]
    pub email: String,
    pub requested_type_ids: Vec<String>,
    pub folder_id: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Create a document request
#[utoipa::path(
    post,
    path = "/api/v0/requests",
    tag = "requests",
    request_body = CreateRequestPayload,
    responses(
        (status = 201, description = "Request created with its upload link", body = RequestResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Folder or document type not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, payload))]
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<impl IntoResponse, HttpAppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid request payload: {}", e)))?;

    if payload.requested_type_ids.is_empty() {
        return Err(HttpAppError(AppError::BadRequest(
            "At least one document type must be requested".to_string(),
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

    if let Some(folder_id) = payload.folder_id {
        if state.folders.get(folder_id).await?.is_none() {
            return Err(HttpAppError(AppError::NotFound(
                "Folder not found".to_string(),
            )));
        }
    }

    let now = Utc::now();
    let request = DocumentRequest {
        id: Uuid::new_v4(),
        folder_id: payload.folder_id,
        email: payload.email,
        requested_type_ids: payload.requested_type_ids,
        expires_at: payload.expires_at,
        accepted_at: None,
        rejected_at: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
    };
    state.requests.insert(&request).await?;

    // The recipient needs somewhere to upload from day one.
    let link = ShareLink::issue(request.id, state.config.share_link_ttl_days);
    state.share_links.insert(&link).await?;

    let mut response = RequestResponse::from(request);
    response.upload_url = Some(link.upload_url(&state.config.public_base_url));
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a request
#[utoipa::path(
    get,
    path = "/api/v0/requests/{id}",
    tag = "requests",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request found", body = RequestResponse),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = state
        .requests
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

    let active_link = state.share_links.find_active(request.id, Utc::now()).await?;

    let mut response = RequestResponse::from(request);
    response.upload_url =
        active_link.map(|link| link.upload_url(&state.config.public_base_url));
    Ok(Json(response))
}
