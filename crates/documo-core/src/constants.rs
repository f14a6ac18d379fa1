//! Application-wide constants.

/// Default lifetime of a share link, in days.
pub const DEFAULT_SHARE_LINK_TTL_DAYS: i64 = 7;

/// Default cap on uploaded file size (25 MB) when a document type does not
/// narrow it further.
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 25 * 1024 * 1024;

/// Default timeout for fetching an encrypted blob before decryption, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Number of random bytes in a share-link token (hex-encoded on the wire).
pub const SHARE_TOKEN_BYTES: usize = 32;
