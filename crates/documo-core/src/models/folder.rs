use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::request::DocumentRequest;

/// A named set of requests built from a folder-type template. Completion
/// aggregates over the folder's requests and cascades from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub requested_type_ids: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// A folder is complete when every one of its requests is complete.
    /// An empty folder is never considered complete.
    pub fn is_satisfied_by(&self, requests: &[DocumentRequest]) -> bool {
        !requests.is_empty() && requests.iter().all(|r| r.completed_at.is_some())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FolderResponse {
    pub id: Uuid,
    pub name: String,
    pub requested_type_ids: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        FolderResponse {
            id: folder.id,
            name: folder.name,
            requested_type_ids: folder.requested_type_ids,
            completed_at: folder.completed_at,
            created_at: folder.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder() -> Folder {
        let now = Utc::now();
        Folder {
            id: Uuid::new_v4(),
            name: "KYC onboarding".to_string(),
            requested_type_ids: vec!["identity_card".to_string()],
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(folder_id: Uuid, completed: bool) -> DocumentRequest {
        let now = Utc::now();
        DocumentRequest {
            id: Uuid::new_v4(),
            folder_id: Some(folder_id),
            email: "someone@example.com".to_string(),
            requested_type_ids: vec!["identity_card".to_string()],
            expires_at: None,
            accepted_at: None,
            rejected_at: None,
            completed_at: completed.then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_complete_when_all_requests_complete() {
        let f = folder();
        let requests = vec![request(f.id, true), request(f.id, true)];
        assert!(f.is_satisfied_by(&requests));
    }

    #[test]
    fn test_incomplete_with_one_open_request() {
        let f = folder();
        let requests = vec![request(f.id, true), request(f.id, false)];
        assert!(!f.is_satisfied_by(&requests));
    }

    #[test]
    fn test_empty_folder_is_not_complete() {
        assert!(!folder().is_satisfied_by(&[]));
    }
}
