//! Cascade loading and atomic application for the lifecycle service.
//!
//! A validate/invalidate touches up to three entities (document, request,
//! folder). `apply_cascade` writes them in one transaction so a partial
//! failure can never leave a document invalidated while its request still
//! reads as completed.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use documo_core::models::{Document, DocumentRequest, Folder};
use documo_core::AppError;

use crate::stores::{CascadeSnapshot, CascadeUpdate, LifecycleStore};

const DOCUMENT_COLUMNS: &str = r#"
    id, request_id, type_id, file_name, mime_type, original_size,
    storage_key, url, hash, dek, validation_errors,
    uploaded_at, validated_at, invalidated_at, error_at, error_message, updated_at
"#;

const REQUEST_COLUMNS: &str = r#"
    id, folder_id, email, requested_type_ids, expires_at,
    accepted_at, rejected_at, completed_at, created_at, updated_at
"#;

#[derive(Clone)]
pub struct LifecycleRepository {
    pool: PgPool,
}

impl LifecycleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LifecycleStore for LifecycleRepository {
    #[tracing::instrument(skip(self))]
    async fn load_cascade(&self, document_id: Uuid) -> Result<CascadeSnapshot, AppError> {
        let document = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        let request = sqlx::query_as::<_, DocumentRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = $1"
        ))
        .bind(document.request_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

        let request_documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE request_id = $1 ORDER BY uploaded_at"
        ))
        .bind(request.id)
        .fetch_all(&self.pool)
        .await?;

        let (folder, folder_requests) = match request.folder_id {
            Some(folder_id) => {
                let folder = sqlx::query_as::<_, Folder>(
                    r#"
                    SELECT id, name, requested_type_ids, completed_at, created_at, updated_at
                    FROM folders WHERE id = $1
                    "#,
                )
                .bind(folder_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;

                let folder_requests = sqlx::query_as::<_, DocumentRequest>(&format!(
                    "SELECT {REQUEST_COLUMNS} FROM requests WHERE folder_id = $1 ORDER BY created_at"
                ))
                .bind(folder_id)
                .fetch_all(&self.pool)
                .await?;

                (Some(folder), folder_requests)
            }
            None => (None, Vec::new()),
        };

        Ok(CascadeSnapshot {
            document,
            request,
            request_documents,
            folder,
            folder_requests,
        })
    }

    #[tracing::instrument(skip(self, update), fields(document_id = %update.document_id))]
    async fn apply_cascade(&self, update: &CascadeUpdate) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin cascade transaction")
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET validated_at = $2, invalidated_at = $3, validation_errors = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(update.document_id)
        .bind(update.validated_at)
        .bind(update.invalidated_at)
        .bind(&update.validation_errors)
        .bind(update.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Document not found".to_string()));
        }

        if let Some(completed_at) = update.request_completed_at {
            let result = sqlx::query(
                "UPDATE requests SET completed_at = $2, updated_at = $3 WHERE id = $1",
            )
            .bind(update.request_id)
            .bind(completed_at)
            .bind(update.updated_at)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound("Request not found".to_string()));
            }
        }

        if let (Some(folder_id), Some(completed_at)) =
            (update.folder_id, update.folder_completed_at)
        {
            let result = sqlx::query(
                "UPDATE folders SET completed_at = $2, updated_at = $3 WHERE id = $1",
            )
            .bind(folder_id)
            .bind(completed_at)
            .bind(update.updated_at)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound("Folder not found".to_string()));
            }
        }

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to commit cascade transaction");
            AppError::Database(e)
        })?;

        Ok(())
    }
}
