use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reference data describing one kind of collectable document: which MIME
/// types are accepted and how large the file may be.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DocumentType {
    pub id: String,
    pub label: String,
    pub accepted_mime_types: Vec<String>,
    pub max_size: i64,
}

impl DocumentType {
    pub fn accepts_mime_type(&self, mime_type: &str) -> bool {
        self.accepted_mime_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(mime_type))
    }
}
