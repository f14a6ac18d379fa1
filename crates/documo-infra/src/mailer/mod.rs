//! Outbound mail: invalidation notices with a re-upload link.

mod log;
mod recording;
mod smtp;

use async_trait::async_trait;

/// Result of one dispatch attempt. Dispatch failures are reported, never
/// raised: the state change that triggered the email is already committed.
#[derive(Debug, Clone)]
pub struct MailOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl MailOutcome {
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Tell `to` their document was refused, why, and where to re-upload.
    async fn send_document_invalidated(
        &self,
        to: &str,
        reason: &str,
        upload_url: &str,
    ) -> MailOutcome;
}

pub use log::LogMailer;
pub use recording::{RecordedInvalidation, RecordingMailer};
pub use smtp::SmtpMailer;
