//! Decrypted-view sessions for rendering and download.

mod session;

pub use session::{DecryptedHandle, DecryptedViewSession};
