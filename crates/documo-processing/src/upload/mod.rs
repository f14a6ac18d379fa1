//! Encrypted upload pipeline: hash → encrypt → store → persist → validate →
//! finalize.

mod pipeline;
mod progress;
mod types;

pub use pipeline::{UploadPipeline, UploadRequest};
pub use progress::{ProgressSink, UploadEvent};
pub use types::UploadFile;
