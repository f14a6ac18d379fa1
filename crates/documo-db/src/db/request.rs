use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use documo_core::models::DocumentRequest;
use documo_core::AppError;

use crate::stores::RequestStore;

const REQUEST_COLUMNS: &str = r#"
    id, folder_id, email, requested_type_ids, expires_at,
    accepted_at, rejected_at, completed_at, created_at, updated_at
"#;

#[derive(Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestStore for RequestRepository {
    async fn get(&self, id: Uuid) -> Result<Option<DocumentRequest>, AppError> {
        let request = sqlx::query_as::<_, DocumentRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch request by ID: {}", e);
            AppError::Internal("Failed to fetch request".to_string())
        })?;

        Ok(request)
    }

    #[tracing::instrument(skip(self, request), fields(request_id = %request.id))]
    async fn insert(&self, request: &DocumentRequest) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO requests (
                id, folder_id, email, requested_type_ids, expires_at,
                accepted_at, rejected_at, completed_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(request.id)
        .bind(request.folder_id)
        .bind(&request.email)
        .bind(&request.requested_type_ids)
        .bind(request.expires_at)
        .bind(request.accepted_at)
        .bind(request.rejected_at)
        .bind(request.completed_at)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert request: {}", e);
            AppError::Internal("Failed to insert request".to_string())
        })?;

        tracing::info!(request_id = %request.id, email = %request.email, "Request created");
        Ok(())
    }

    async fn set_completed_at(
        &self,
        id: Uuid,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE requests SET completed_at = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update request completion: {}", e);
            AppError::Internal("Failed to update request completion".to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Request not found".to_string()));
        }
        Ok(())
    }

    async fn list_for_folder(&self, folder_id: Uuid) -> Result<Vec<DocumentRequest>, AppError> {
        let requests = sqlx::query_as::<_, DocumentRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE folder_id = $1 ORDER BY created_at"
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list requests for folder: {}", e);
            AppError::Internal("Failed to list requests".to_string())
        })?;

        Ok(requests)
    }
}
