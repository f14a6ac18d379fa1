use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use documo_core::models::DocumentResponse;
use documo_core::AppError;
use documo_processing::{DecryptedViewSession, UploadFile, UploadRequest};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Pull the document type id and the file out of a multipart body.
pub(crate) async fn read_upload_parts(
    multipart: &mut Multipart,
) -> Result<(String, UploadFile), AppError> {
    let mut type_id: Option<String> = None;
    let mut file: Option<UploadFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("type_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable type_id: {}", e)))?;
                type_id = Some(value);
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::BadRequest("File part has no filename".to_string()))?;
                let mime_type = field
                    .content_type()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::BadRequest("File part has no content type".to_string())
                    })?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable file part: {}", e)))?;
                file = Some(UploadFile {
                    file_name,
                    mime_type,
                    data: data.to_vec(),
                });
            }
            _ => {}
        }
    }

    let type_id =
        type_id.ok_or_else(|| AppError::BadRequest("Missing 'type_id' field".to_string()))?;
    let file = file.ok_or_else(|| AppError::BadRequest("Missing 'file' part".to_string()))?;
    Ok((type_id, file))
}

pub(crate) async fn run_upload(
    state: &AppState,
    request_id: Uuid,
    multipart: &mut Multipart,
) -> Result<DocumentResponse, AppError> {
    let (type_id, file) = read_upload_parts(multipart).await?;

    if file.data.is_empty() {
        return Err(AppError::BadRequest("File is empty".to_string()));
    }

    let document = state
        .pipeline
        .upload(
            UploadRequest {
                request_id,
                type_id,
                file,
                key: None,
                recorded_hash: None,
            },
            None,
        )
        .await?;

    Ok(DocumentResponse::from(document))
}

/// Upload a document against a request
#[utoipa::path(
    post,
    path = "/api/v0/requests/{id}/documents",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 201, description = "Document uploaded and validated", body = DocumentResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Request or document type not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = state
        .requests
        .get(request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

    let response = run_upload(&state, request.id, &mut multipart).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get document metadata and derived status
#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let document = state
        .documents
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    Ok(Json(DocumentResponse::from(document)))
}

/// Download the decrypted content of a document
#[utoipa::path(
    get,
    path = "/api/v0/documents/{id}/content",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Decrypted document content"),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 409, description = "Document has no content or key", body = ErrorResponse),
        (status = 503, description = "Content fetch failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_document_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let document = state
        .documents
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    let file_name = document.file_name.clone();
    let mut session = DecryptedViewSession::new(
        document,
        state.storage.clone(),
        Duration::from_secs(state.config.fetch_timeout_secs),
    );
    session.ensure().await;

    if let Some(message) = session.error() {
        return Err(HttpAppError(view_error(message)));
    }

    let handle = session
        .handle()
        .ok_or_else(|| AppError::Internal("Decryption produced no content".to_string()))?;
    let body = handle
        .read()
        .await
        .map_err(|e| AppError::Internal(format!("Could not read decrypted content: {}", e)))?;
    let mime_type = handle.mime_type().to_string();

    // The handle (and its temp file) is revoked when the session drops.
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

/// Map a session's user-facing failure message onto the error taxonomy.
fn view_error(message: &str) -> AppError {
    match message {
        "Document has no uploaded content" | "Document has no key material" => {
            AppError::Configuration(message.to_string())
        }
        "Document could not be decrypted" => AppError::Integrity,
        _ => AppError::Transient(message.to_string()),
    }
}
