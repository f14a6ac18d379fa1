use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::SHARE_TOKEN_BYTES;

/// A token-bearing link allowing an external, unauthenticated recipient to
/// upload documents for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShareLink {
    pub id: Uuid,
    pub request_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ShareLink {
    /// Mint a fresh link with a random unguessable token and the given TTL.
    pub fn issue(request_id: Uuid, ttl_days: i64) -> Self {
        let mut bytes = [0u8; SHARE_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let now = Utc::now();
        ShareLink {
            id: Uuid::new_v4(),
            request_id,
            token: hex::encode(bytes),
            expires_at: now + Duration::days(ttl_days),
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Upload URL handed to the recipient.
    pub fn upload_url(&self, public_base_url: &str) -> String {
        format!("{}/upload/{}", public_base_url.trim_end_matches('/'), self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_tokens_are_unique_and_unguessable_length() {
        let request_id = Uuid::new_v4();
        let a = ShareLink::issue(request_id, 7);
        let b = ShareLink::issue(request_id, 7);
        assert_ne!(a.token, b.token);
        assert_eq!(a.token.len(), SHARE_TOKEN_BYTES * 2);
    }

    #[test]
    fn test_expiry() {
        let link = ShareLink::issue(Uuid::new_v4(), 7);
        assert!(!link.is_expired(Utc::now()));
        assert!(link.is_expired(Utc::now() + Duration::days(8)));
    }

    #[test]
    fn test_upload_url_strips_trailing_slash() {
        let link = ShareLink::issue(Uuid::new_v4(), 7);
        let url = link.upload_url("https://docs.example.com/");
        assert_eq!(
            url,
            format!("https://docs.example.com/upload/{}", link.token)
        );
    }
}
