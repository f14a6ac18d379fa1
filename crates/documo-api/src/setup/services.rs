//! Service construction and router assembly.

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use documo_core::{Config, StorageConfig};
use documo_db::{
    DocumentRepository, DocumentTypeRepository, FolderRepository, LifecycleRepository,
    RequestRepository, ShareLinkRepository,
};
use documo_infra::mailer::LogMailer;
use documo_infra::{LifecycleConfig, LifecycleService, Mailer, SmtpMailer};
use documo_processing::UploadPipeline;
use documo_storage::{LocalStorage, Storage};

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let storage = build_storage(&config).await?;

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpMailer::new(smtp).context("Failed to build SMTP mailer")?),
        None => Arc::new(LogMailer::new()),
    };

    let documents = Arc::new(DocumentRepository::new(pool.clone()));
    let requests = Arc::new(RequestRepository::new(pool.clone()));
    let folders = Arc::new(FolderRepository::new(pool.clone()));
    let share_links = Arc::new(ShareLinkRepository::new(pool.clone()));
    let document_types = Arc::new(DocumentTypeRepository::new(pool.clone()));

    let lifecycle = Arc::new(LifecycleService::new(
        Arc::new(LifecycleRepository::new(pool.clone())),
        share_links.clone(),
        mailer,
        LifecycleConfig {
            public_base_url: config.public_base_url.clone(),
            share_link_ttl_days: config.share_link_ttl_days,
        },
    ));

    let pipeline = UploadPipeline::new(
        documents.clone(),
        document_types.clone(),
        storage.clone(),
        lifecycle.clone(),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        documents,
        requests,
        folders,
        share_links,
        document_types,
        storage,
        lifecycle,
        pipeline,
    });

    let router = build_router(state.clone(), &config);
    Ok((state, router))
}

async fn build_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    match &config.storage {
        StorageConfig::Local { root, base_url } => {
            tracing::info!(root = %root, "Using local blob storage");
            Ok(Arc::new(LocalStorage::new(root.clone(), base_url.clone())))
        }
        StorageConfig::S3 {
            bucket,
            region,
            endpoint_url,
        } => {
            #[cfg(feature = "storage-s3")]
            {
                tracing::info!(bucket = %bucket, region = %region, "Using S3 blob storage");
                let storage = documo_storage::S3Storage::new(
                    bucket.clone(),
                    region.clone(),
                    endpoint_url.clone(),
                )
                .await
                .map_err(|e| anyhow::anyhow!("Failed to initialize S3 storage: {}", e))?;
                Ok(Arc::new(storage))
            }
            #[cfg(not(feature = "storage-s3"))]
            {
                let _ = (region, endpoint_url);
                anyhow::bail!(
                    "S3 storage backend selected (bucket '{}') but the storage-s3 feature is disabled",
                    bucket
                )
            }
        }
    }
}

fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route(
            "/api/v0/requests",
            post(handlers::requests::create_request),
        )
        .route(
            "/api/v0/requests/{id}",
            get(handlers::requests::get_request),
        )
        .route(
            "/api/v0/requests/{id}/documents",
            post(handlers::documents::upload_document),
        )
        .route(
            "/api/v0/documents/{id}",
            get(handlers::documents::get_document),
        )
        .route(
            "/api/v0/documents/{id}/content",
            get(handlers::documents::get_document_content),
        )
        .route(
            "/api/v0/documents/{id}/validate",
            post(handlers::lifecycle::validate_document),
        )
        .route(
            "/api/v0/documents/{id}/invalidate",
            post(handlers::lifecycle::invalidate_document),
        )
        .route("/api/v0/folders", post(handlers::folders::create_folder))
        .route("/api/v0/folders/{id}", get(handlers::folders::get_folder))
        .route(
            "/api/v0/upload/{token}",
            post(handlers::share_upload::upload_via_share_link),
        )
        .route("/api/v0/openapi.json", get(openapi_spec))
        .route("/health", get(health))
        // Leave headroom for multipart framing on top of the file itself.
        .layer(DefaultBodyLimit::max(config.max_upload_size + 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn health() -> &'static str {
    "ok"
}
