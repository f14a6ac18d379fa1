//! Document processing: validation, the encrypted upload pipeline and the
//! decrypted-view session.

pub mod upload;
pub mod validator;
pub mod view;

pub use upload::{UploadEvent, UploadFile, UploadPipeline, UploadRequest};
pub use validator::{validate_document, ValidationOutcome};
pub use view::{DecryptedHandle, DecryptedViewSession};
