//! Log-only mailer for environments without SMTP configured.

use async_trait::async_trait;

use super::{MailOutcome, Mailer};

/// Writes the would-be email to the log and reports success. Used when no
/// SMTP host is configured (local development, previews).
#[derive(Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_document_invalidated(
        &self,
        to: &str,
        reason: &str,
        upload_url: &str,
    ) -> MailOutcome {
        tracing::info!(
            to = %to,
            reason = %reason,
            upload_url = %upload_url,
            "SMTP not configured; invalidation email logged instead of sent"
        );
        MailOutcome::sent()
    }
}
