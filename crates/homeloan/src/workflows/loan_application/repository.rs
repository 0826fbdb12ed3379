use serde::{Deserialize, Serialize};

use super::domain::{ApplicationRecord, RecordId, UserId};

/// Remote object storage receiving uploaded documents.
pub trait DocumentStorage: Send + Sync {
    /// Store `bytes` at `path`, returning the remote URL.
    fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Remote document database holding submitted applications.
pub trait ApplicationRecordStore: Send + Sync {
    /// Create a new record; the store assigns `submitted_at`.
    fn create(
        &self,
        collection: &str,
        record: ApplicationRecord,
    ) -> Result<RecordId, RecordStoreError>;
    fn list_for_user(
        &self,
        collection: &str,
        user_id: &UserId,
    ) -> Result<Vec<(RecordId, ApplicationRecord)>, RecordStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error("record rejected: {0}")]
    Rejected(String),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Signed-in identity consulted at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: UserId,
}

pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;
}
