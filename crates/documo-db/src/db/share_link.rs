use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use documo_core::models::ShareLink;
use documo_core::AppError;

use crate::stores::ShareLinkStore;

const SHARE_LINK_COLUMNS: &str = "id, request_id, token, expires_at, created_at";

#[derive(Clone)]
pub struct ShareLinkRepository {
    pool: PgPool,
}

impl ShareLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareLinkStore for ShareLinkRepository {
    async fn find_active(
        &self,
        request_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<ShareLink>, AppError> {
        let link = sqlx::query_as::<_, ShareLink>(&format!(
            r#"
            SELECT {SHARE_LINK_COLUMNS}
            FROM share_links
            WHERE request_id = $1 AND expires_at > $2
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(request_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find active share link: {}", e);
            AppError::Internal("Failed to find share link".to_string())
        })?;

        Ok(link)
    }

    async fn insert(&self, link: &ShareLink) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO share_links (id, request_id, token, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(link.id)
        .bind(link.request_id)
        .bind(&link.token)
        .bind(link.expires_at)
        .bind(link.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert share link: {}", e);
            AppError::Internal("Failed to insert share link".to_string())
        })?;

        tracing::info!(
            request_id = %link.request_id,
            expires_at = %link.expires_at,
            "Share link issued"
        );
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<ShareLink>, AppError> {
        let link = sqlx::query_as::<_, ShareLink>(&format!(
            "SELECT {SHARE_LINK_COLUMNS} FROM share_links WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch share link by token: {}", e);
            AppError::Internal("Failed to fetch share link".to_string())
        })?;

        Ok(link)
    }
}
