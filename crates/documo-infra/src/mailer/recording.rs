//! Recording mailer for tests: captures dispatches instead of sending.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{MailOutcome, Mailer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInvalidation {
    pub to: String,
    pub reason: String,
    pub upload_url: String,
}

#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<RecordedInvalidation>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent dispatch attempts fail (still recorded).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<RecordedInvalidation> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_document_invalidated(
        &self,
        to: &str,
        reason: &str,
        upload_url: &str,
    ) -> MailOutcome {
        self.sent.lock().unwrap().push(RecordedInvalidation {
            to: to.to_string(),
            reason: reason.to_string(),
            upload_url: upload_url.to_string(),
        });

        if self.failing.load(Ordering::SeqCst) {
            MailOutcome::failed("smtp unavailable")
        } else {
            MailOutcome::sent()
        }
    }
}
