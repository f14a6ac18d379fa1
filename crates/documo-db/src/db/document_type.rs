use async_trait::async_trait;
use sqlx::PgPool;

use documo_core::models::DocumentType;
use documo_core::AppError;

use crate::stores::DocumentTypeStore;

const DOCUMENT_TYPE_COLUMNS: &str = "id, label, accepted_mime_types, max_size";

/// Reference data; rows are seeded by migration or back-office tooling.
#[derive(Clone)]
pub struct DocumentTypeRepository {
    pool: PgPool,
}

impl DocumentTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentTypeStore for DocumentTypeRepository {
    async fn get(&self, type_id: &str) -> Result<Option<DocumentType>, AppError> {
        let doc_type = sqlx::query_as::<_, DocumentType>(&format!(
            "SELECT {DOCUMENT_TYPE_COLUMNS} FROM document_types WHERE id = $1"
        ))
        .bind(type_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch document type: {}", e);
            AppError::Internal("Failed to fetch document type".to_string())
        })?;

        Ok(doc_type)
    }

    async fn list(&self) -> Result<Vec<DocumentType>, AppError> {
        let types = sqlx::query_as::<_, DocumentType>(&format!(
            "SELECT {DOCUMENT_TYPE_COLUMNS} FROM document_types ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list document types: {}", e);
            AppError::Internal("Failed to list document types".to_string())
        })?;

        Ok(types)
    }
}
