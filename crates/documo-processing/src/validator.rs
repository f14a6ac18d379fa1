//! Document validation against its declared type's rules.
//!
//! Every applicable check runs; errors accumulate instead of
//! short-circuiting so one call reports every defect at once.

use subtle::ConstantTimeEq;

use documo_core::models::DocumentType;
use documo_crypto::sha256_hex;

use crate::upload::UploadFile;

/// Exact message appended on a hash mismatch. No interpolated values: the
/// recorded digest never reaches the client.
pub const INTEGRITY_ERROR: &str = "File integrity check failed";

#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Check a candidate file against the rules of its document type.
///
/// `recorded_hash` is the digest previously stored for this document, when
/// one exists (re-upload of a replacement). Pure: no side effects beyond
/// computing the candidate's digest.
pub fn validate_document(
    rules: &DocumentType,
    file: &UploadFile,
    recorded_hash: Option<&str>,
) -> ValidationOutcome {
    let mut errors = Vec::new();

    if !rules.accepts_mime_type(&file.mime_type) {
        errors.push(format!(
            "Invalid file type '{}'. Allowed: {}",
            file.mime_type,
            rules.accepted_mime_types.join(", ")
        ));
    }

    if file.size() > rules.max_size {
        errors.push(format!(
            "File too large: {} bytes exceeds maximum of {} bytes",
            file.size(),
            rules.max_size
        ));
    }

    if let Some(recorded) = recorded_hash {
        let computed = sha256_hex(&file.data);
        if computed.as_bytes().ct_eq(recorded.as_bytes()).unwrap_u8() != 1 {
            errors.push(INTEGRITY_ERROR.to_string());
        }
    }

    ValidationOutcome {
        is_valid: errors.is_empty(),
        errors,
    }
}
