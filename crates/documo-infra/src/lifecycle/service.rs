//! Validate/invalidate cascade over the document-request-folder triple.
//!
//! Each call is one independent transaction scoped to a single triple;
//! cascades on unrelated triples interleave freely. State is committed
//! before any email leaves the building: a dispatch failure is reported to
//! the caller but never rolls the transition back.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use documo_core::models::{Document, DocumentRequest, ShareLink};
use documo_core::AppError;
use documo_db::{CascadeSnapshot, CascadeUpdate, LifecycleStore, ShareLinkStore};

use crate::mailer::Mailer;

#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub public_base_url: String,
    pub share_link_ttl_days: i64,
}

/// Result of an invalidation: the upload URL the recipient was (or should
/// have been) sent, and whether the email actually went out.
#[derive(Debug, Clone)]
pub struct InvalidationOutcome {
    pub email_sent: bool,
    pub upload_url: String,
}

pub struct LifecycleService {
    store: Arc<dyn LifecycleStore>,
    share_links: Arc<dyn ShareLinkStore>,
    mailer: Arc<dyn Mailer>,
    config: LifecycleConfig,
}

impl LifecycleService {
    pub fn new(
        store: Arc<dyn LifecycleStore>,
        share_links: Arc<dyn ShareLinkStore>,
        mailer: Arc<dyn Mailer>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            store,
            share_links,
            mailer,
            config,
        }
    }

    /// Accept a document and cascade completion up to its request and
    /// folder. Idempotent: an already-set completion timestamp is left
    /// untouched. No email is sent on validation.
    #[tracing::instrument(skip(self))]
    pub async fn validate(&self, document_id: Uuid) -> Result<(), AppError> {
        let snapshot = self.store.load_cascade(document_id).await?;
        let now = Utc::now();

        let mut document = snapshot.document.clone();
        document.mark_validated(now);

        let request_completed_at = self.completion_after(&snapshot, &document, now);
        let folder_completed_at =
            self.folder_completion_after(&snapshot, request_completed_at, now);

        self.store
            .apply_cascade(&CascadeUpdate {
                document_id,
                validated_at: document.validated_at,
                invalidated_at: None,
                validation_errors: vec![],
                updated_at: now,
                request_id: snapshot.request.id,
                request_completed_at,
                folder_id: snapshot.folder.as_ref().map(|f| f.id),
                folder_completed_at,
            })
            .await?;

        tracing::info!(
            document_id = %document_id,
            request_id = %snapshot.request.id,
            request_completed = request_completed_at.map(|c| c.is_some()).unwrap_or(snapshot.request.completed_at.is_some()),
            "Document validated"
        );
        Ok(())
    }

    /// Reject a document with a reason, reopen its request and folder, and
    /// notify the recipient with a re-upload link.
    ///
    /// Idempotent under retry: the same reason twice yields the same end
    /// state, and a still-valid share link is reused rather than re-minted.
    #[tracing::instrument(skip(self, reason))]
    pub async fn invalidate(
        &self,
        document_id: Uuid,
        reason: &str,
    ) -> Result<InvalidationOutcome, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::BadRequest(
                "Invalidation reason must not be empty".to_string(),
            ));
        }

        let snapshot = self.store.load_cascade(document_id).await?;
        let now = Utc::now();

        let mut document = snapshot.document.clone();
        document.mark_invalidated(now, reason);

        // One invalidation reopens the whole request and folder, whatever
        // the other documents look like.
        self.store
            .apply_cascade(&CascadeUpdate {
                document_id,
                validated_at: None,
                invalidated_at: document.invalidated_at,
                validation_errors: document.validation_errors.clone(),
                updated_at: now,
                request_id: snapshot.request.id,
                request_completed_at: Some(None),
                folder_id: snapshot.folder.as_ref().map(|f| f.id),
                folder_completed_at: snapshot.folder.as_ref().map(|_| None),
            })
            .await?;

        let link = self.active_or_new_link(snapshot.request.id).await?;
        let upload_url = link.upload_url(&self.config.public_base_url);

        let outcome = self
            .mailer
            .send_document_invalidated(&snapshot.request.email, reason, &upload_url)
            .await;

        if !outcome.success {
            tracing::warn!(
                document_id = %document_id,
                request_id = %snapshot.request.id,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "Invalidation email dispatch failed; state change is committed"
            );
        } else {
            tracing::info!(
                document_id = %document_id,
                request_id = %snapshot.request.id,
                "Document invalidated, recipient notified"
            );
        }

        Ok(InvalidationOutcome {
            email_sent: outcome.success,
            upload_url,
        })
    }

    /// Completion value for the request after `updated` replaces its old
    /// version in the snapshot. `None` leaves the stored value untouched.
    fn completion_after(
        &self,
        snapshot: &CascadeSnapshot,
        updated: &Document,
        now: chrono::DateTime<Utc>,
    ) -> Option<Option<chrono::DateTime<Utc>>> {
        let documents: Vec<Document> = snapshot
            .request_documents
            .iter()
            .map(|d| {
                if d.id == updated.id {
                    updated.clone()
                } else {
                    d.clone()
                }
            })
            .collect();

        if snapshot.request.is_satisfied_by(&documents) {
            match snapshot.request.completed_at {
                Some(_) => None,
                None => Some(Some(now)),
            }
        } else {
            None
        }
    }

    /// Folder completion after the request's new completion value is known.
    fn folder_completion_after(
        &self,
        snapshot: &CascadeSnapshot,
        request_completed_at: Option<Option<chrono::DateTime<Utc>>>,
        now: chrono::DateTime<Utc>,
    ) -> Option<Option<chrono::DateTime<Utc>>> {
        let folder = snapshot.folder.as_ref()?;

        let effective_completion =
            request_completed_at.unwrap_or(snapshot.request.completed_at);
        let requests: Vec<DocumentRequest> = snapshot
            .folder_requests
            .iter()
            .map(|r| {
                if r.id == snapshot.request.id {
                    let mut updated = r.clone();
                    updated.completed_at = effective_completion;
                    updated
                } else {
                    r.clone()
                }
            })
            .collect();

        if folder.is_satisfied_by(&requests) {
            match folder.completed_at {
                Some(_) => None,
                None => Some(Some(now)),
            }
        } else {
            None
        }
    }

    /// Reuse the request's newest non-expired share link, or mint a fresh
    /// one. An expired link is never reused, even when present.
    async fn active_or_new_link(&self, request_id: Uuid) -> Result<ShareLink, AppError> {
        let now = Utc::now();
        if let Some(existing) = self.share_links.find_active(request_id, now).await? {
            return Ok(existing);
        }

        let link = ShareLink::issue(request_id, self.config.share_link_ttl_days);
        self.share_links.insert(&link).await?;
        Ok(link)
    }
}
