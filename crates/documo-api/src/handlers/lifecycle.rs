use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvalidateRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvalidateResponse {
    pub success: bool,
    /// Whether the notification email actually went out. The state change
    /// is committed either way.
    pub email_sent: bool,
}

/// Accept a document
#[utoipa::path(
    post,
    path = "/api/v0/documents/{id}/validate",
    tag = "lifecycle",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document validated", body = ValidateResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn validate_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.lifecycle.validate(id).await?;
    Ok(Json(ValidateResponse { success: true }))
}

/// Reject a document with a reason
#[utoipa::path(
    post,
    path = "/api/v0/documents/{id}/invalidate",
    tag = "lifecycle",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    request_body = InvalidateRequest,
    responses(
        (status = 200, description = "Document invalidated", body = InvalidateResponse),
        (status = 400, description = "Missing reason", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body))]
pub async fn invalidate_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<InvalidateRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let outcome = state.lifecycle.invalidate(id, &body.reason).await?;
    Ok(Json(InvalidateResponse {
        success: true,
        email_sent: outcome.email_sent,
    }))
}
