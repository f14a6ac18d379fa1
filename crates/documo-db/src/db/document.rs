use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use documo_core::models::Document;
use documo_core::AppError;

use crate::stores::DocumentStore;

const DOCUMENT_COLUMNS: &str = r#"
    id, request_id, type_id, file_name, mime_type, original_size,
    storage_key, url, hash, dek, validation_errors,
    uploaded_at, validated_at, invalidated_at, error_at, error_message, updated_at
"#;

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch document by ID: {}", e);
            AppError::Internal("Failed to fetch document".to_string())
        })?;

        Ok(document)
    }

    #[tracing::instrument(skip(self, document), fields(document_id = %document.id))]
    async fn insert(&self, document: &Document) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, request_id, type_id, file_name, mime_type, original_size,
                storage_key, url, hash, dek, validation_errors,
                uploaded_at, validated_at, invalidated_at, error_at, error_message, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(document.id)
        .bind(document.request_id)
        .bind(&document.type_id)
        .bind(&document.file_name)
        .bind(&document.mime_type)
        .bind(document.original_size)
        .bind(&document.storage_key)
        .bind(&document.url)
        .bind(&document.hash)
        .bind(&document.dek)
        .bind(&document.validation_errors)
        .bind(document.uploaded_at)
        .bind(document.validated_at)
        .bind(document.invalidated_at)
        .bind(document.error_at)
        .bind(&document.error_message)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert document: {}", e);
            AppError::Internal("Failed to insert document".to_string())
        })?;

        tracing::info!(
            document_id = %document.id,
            request_id = %document.request_id,
            type_id = %document.type_id,
            "Document persisted"
        );
        Ok(())
    }

    async fn list_for_request(&self, request_id: Uuid) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE request_id = $1 ORDER BY uploaded_at"
        ))
        .bind(request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list documents for request: {}", e);
            AppError::Internal("Failed to list documents".to_string())
        })?;

        Ok(documents)
    }

    async fn update_validation(
        &self,
        id: Uuid,
        validated_at: Option<DateTime<Utc>>,
        invalidated_at: Option<DateTime<Utc>>,
        validation_errors: &[String],
    ) -> Result<Document, AppError> {
        let document = sqlx::query_as::<_, Document>(&format!(
            r#"
            UPDATE documents
            SET validated_at = $2, invalidated_at = $3, validation_errors = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(validated_at)
        .bind(invalidated_at)
        .bind(validation_errors)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::RowNotFound = e {
                AppError::NotFound("Document not found".to_string())
            } else {
                tracing::error!("Failed to update document validation: {}", e);
                AppError::Internal("Failed to update document validation".to_string())
            }
        })?;

        Ok(document)
    }

    async fn record_error(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        message: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE documents
            SET error_at = $2, error_message = $3, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(at)
        .bind(message)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record document error: {}", e);
            AppError::Internal("Failed to record document error".to_string())
        })?;

        Ok(())
    }
}
