//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Documo API",
        description = "Request and securely collect documents from end users"
    ),
    paths(
        crate::handlers::documents::upload_document,
        crate::handlers::documents::get_document,
        crate::handlers::documents::get_document_content,
        crate::handlers::lifecycle::validate_document,
        crate::handlers::lifecycle::invalidate_document,
        crate::handlers::requests::create_request,
        crate::handlers::requests::get_request,
        crate::handlers::folders::create_folder,
        crate::handlers::folders::get_folder,
        crate::handlers::share_upload::upload_via_share_link,
    ),
    components(schemas(
        documo_core::models::DocumentResponse,
        documo_core::models::RequestResponse,
        documo_core::models::FolderResponse,
        documo_core::models::DocumentStatus,
        crate::error::ErrorResponse,
        crate::handlers::lifecycle::ValidateResponse,
        crate::handlers::lifecycle::InvalidateRequest,
        crate::handlers::lifecycle::InvalidateResponse,
        crate::handlers::requests::CreateRequestPayload,
        crate::handlers::folders::CreateFolderPayload,
    )),
    tags(
        (name = "documents", description = "Document upload and retrieval"),
        (name = "lifecycle", description = "Document validation and invalidation"),
        (name = "requests", description = "Document collection requests"),
        (name = "folders", description = "Folders of requests"),
    )
)]
pub struct ApiDoc;
