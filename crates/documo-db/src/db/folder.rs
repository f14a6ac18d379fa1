use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use documo_core::models::Folder;
use documo_core::AppError;

use crate::stores::FolderStore;

const FOLDER_COLUMNS: &str =
    "id, name, requested_type_ids, completed_at, created_at, updated_at";

#[derive(Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Folder>, AppError> {
        let folder = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch folder by ID: {}", e);
            AppError::Internal("Failed to fetch folder".to_string())
        })?;

        Ok(folder)
    }

    #[tracing::instrument(skip(self, folder), fields(folder_id = %folder.id))]
    async fn insert(&self, folder: &Folder) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO folders (id, name, requested_type_ids, completed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(folder.id)
        .bind(&folder.name)
        .bind(&folder.requested_type_ids)
        .bind(folder.completed_at)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert folder: {}", e);
            AppError::Internal("Failed to insert folder".to_string())
        })?;

        tracing::info!(folder_id = %folder.id, name = %folder.name, "Folder created");
        Ok(())
    }

    async fn set_completed_at(
        &self,
        id: Uuid,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE folders SET completed_at = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(completed_at)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to update folder completion: {}", e);
                    AppError::Internal("Failed to update folder completion".to_string())
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Folder not found".to_string()));
        }
        Ok(())
    }
}
