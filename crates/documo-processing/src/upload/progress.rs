//! Upload progress reporting.
//!
//! Each pipeline invocation reports through its own callback, so any number
//! of concurrent uploads can report independently. Progress is an
//! observability signal only, never a correctness gate.

use documo_core::models::DocumentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadEvent {
    /// The pipeline moved to a new lifecycle stage.
    Stage(DocumentStatus),
    /// Transfer progress, 0..=100.
    Transfer(u8),
}

/// Callback receiving [`UploadEvent`]s for one upload.
pub type ProgressSink<'a> = &'a (dyn Fn(UploadEvent) + Send + Sync);

pub(crate) fn emit(sink: Option<ProgressSink<'_>>, event: UploadEvent) {
    if let Some(sink) = sink {
        sink(event);
    }
}
