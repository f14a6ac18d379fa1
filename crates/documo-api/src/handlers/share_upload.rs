//! Unauthenticated upload through a share-link token.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use documo_core::models::DocumentResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::documents::run_upload;
use crate::state::AppState;

/// Upload a document through a share link
#[utoipa::path(
    post,
    path = "/api/v0/upload/{token}",
    tag = "documents",
    params(
        ("token" = String, Path, description = "Share-link token")
    ),
    responses(
        (status = 201, description = "Document uploaded and validated", body = DocumentResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Unknown share link", body = ErrorResponse),
        (status = 410, description = "Share link expired", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart, token))]
pub async fn upload_via_share_link(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let link = state.share_links.get_by_token(&token).await?;

    let link = match link {
        Some(link) => link,
        None => {
            return Err(HttpAppError(documo_core::AppError::NotFound(
                "Unknown upload link".to_string(),
            )));
        }
    };

    if link.is_expired(Utc::now()) {
        // Expired links are gone, not retriable.
        return Ok((
            StatusCode::GONE,
            Json(ErrorResponse::new("Upload link has expired", "LINK_EXPIRED")),
        )
            .into_response());
    }

    let response = run_upload(&state, link.request_id, &mut multipart).await?;
    Ok((StatusCode::CREATED, Json(response)).into_response())
}
