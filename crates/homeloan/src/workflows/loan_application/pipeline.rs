//! Ordered upload pipeline and the stage-then-commit submission transaction.

use tracing::{debug, info};

use super::assembler::{assemble_record, UploadedDocuments};
use super::documents::{DocumentLoadError, DocumentLoader};
use super::domain::{ApplicationForm, DocumentSlot, LocalDocument, RecordId, UserId};
use super::repository::{ApplicationRecordStore, DocumentStorage, RecordStoreError, StorageError};

/// `applications/{userId}/{userId}_{slotKey}_{epochMillis}`
pub fn upload_path(user_id: &UserId, slot: DocumentSlot, epoch_millis: i64) -> String {
    format!(
        "applications/{user}/{user}_{slot}_{epoch_millis}",
        user = user_id.0,
        slot = slot.key()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask<'a> {
    pub slot: DocumentSlot,
    pub document: &'a LocalDocument,
}

/// Slot uploads executed strictly in slot order, one at a time.
#[derive(Debug, Clone)]
pub struct UploadPipeline<'a> {
    user_id: UserId,
    tasks: Vec<UploadTask<'a>>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("unable to read {slot:?} document: {source}")]
    Load {
        slot: DocumentSlot,
        #[source]
        source: DocumentLoadError,
    },
    #[error("upload of {slot:?} document failed: {source}")]
    Storage {
        slot: DocumentSlot,
        #[source]
        source: StorageError,
    },
}

impl UploadError {
    pub fn slot(&self) -> DocumentSlot {
        match self {
            UploadError::Load { slot, .. } | UploadError::Storage { slot, .. } => *slot,
        }
    }
}

impl<'a> UploadPipeline<'a> {
    pub fn plan(user_id: &UserId, form: &'a ApplicationForm) -> Self {
        let tasks = form
            .documents
            .populated()
            .map(|(slot, document)| UploadTask { slot, document })
            .collect();
        Self {
            user_id: user_id.clone(),
            tasks,
        }
    }

    pub fn tasks(&self) -> &[UploadTask<'a>] {
        &self.tasks
    }

    /// Run every task in order, stopping at the first failure. `clock` yields epoch
    /// milliseconds for each upload path.
    pub fn run(
        &self,
        loader: &dyn DocumentLoader,
        storage: &dyn DocumentStorage,
        clock: &dyn Fn() -> i64,
    ) -> Result<UploadedDocuments, UploadError> {
        let mut uploaded = UploadedDocuments::new();
        for task in &self.tasks {
            let loaded = loader
                .load(task.document)
                .map_err(|source| UploadError::Load {
                    slot: task.slot,
                    source,
                })?;
            let path = upload_path(&self.user_id, task.slot, clock());
            let url = storage
                .upload(&path, loaded.bytes, &loaded.content_type)
                .map_err(|source| UploadError::Storage {
                    slot: task.slot,
                    source,
                })?;
            debug!(slot = task.slot.key(), %path, "document staged");
            uploaded.insert(task.slot, url);
        }
        Ok(uploaded)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Record(#[from] RecordStoreError),
}

/// Collaborators needed to stage uploads and commit the record.
pub struct SubmissionTransaction<'a> {
    pub loader: &'a dyn DocumentLoader,
    pub storage: &'a dyn DocumentStorage,
    pub records: &'a dyn ApplicationRecordStore,
    pub collection: &'a str,
    pub clock: &'a dyn Fn() -> i64,
}

impl SubmissionTransaction<'_> {
    /// Stage all uploads, then create the record. A staging failure never reaches the
    /// record store, so nothing needs rolling back.
    pub fn execute(
        &self,
        form: &ApplicationForm,
        user_id: &UserId,
    ) -> Result<RecordId, CommitError> {
        let pipeline = UploadPipeline::plan(user_id, form);
        let uploaded = pipeline.run(self.loader, self.storage, self.clock)?;
        let record = assemble_record(form, uploaded, user_id);
        let record_id = self.records.create(self.collection, record)?;
        info!(record_id = %record_id.0, user_id = %user_id, "application record created");
        Ok(record_id)
    }
}
