use std::io::Cursor;

use google_drive3::{api::File, api::Scope, DriveHub};
use tokio::runtime::Runtime;
use tracing::debug;

use super::repository::{DocumentStorage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum DriveOperationError {
    #[error("drive operation failed: {0}")]
    Backend(String),
    #[error("drive runtime unavailable: {0}")]
    Runtime(String),
    #[error("invalid content type '{0}'")]
    ContentType(String),
}

impl From<DriveOperationError> for StorageError {
    fn from(value: DriveOperationError) -> Self {
        match value {
            DriveOperationError::ContentType(_) => StorageError::Rejected(value.to_string()),
            other => StorageError::Unavailable(other.to_string()),
        }
    }
}

/// Document storage backed by a Google Drive folder. Each upload path becomes the file
/// name inside `folder_id`; the returned URL is the file's web view link.
///
/// Build the hub the usual google-drive3 way (a `hyper_util` client plus a `yup_oauth2`
/// authenticator, then `DriveHub::new(client, auth)`), hand it to `with_runtime`, and pass
/// the storage to `WizardContext::new` as `Arc::new(storage)`. Call it outside any async
/// context, since uploads block on the private runtime.
pub struct DriveDocumentStorage<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    hub: DriveHub<C>,
    runtime: Runtime,
    folder_id: String,
}

impl<C> DriveDocumentStorage<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: DriveHub<C>, runtime: Runtime, folder_id: impl Into<String>) -> Self {
        Self {
            hub,
            runtime,
            folder_id: folder_id.into(),
        }
    }

    pub fn with_runtime(
        hub: DriveHub<C>,
        folder_id: impl Into<String>,
    ) -> Result<Self, DriveOperationError> {
        let runtime =
            Runtime::new().map_err(|err| DriveOperationError::Runtime(err.to_string()))?;
        Ok(Self::new(hub, runtime, folder_id))
    }

    fn upload_file(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, DriveOperationError> {
        let mime_type: mime::Mime = content_type
            .parse()
            .map_err(|_| DriveOperationError::ContentType(content_type.to_string()))?;
        let metadata = File {
            name: Some(path.replace('/', "_")),
            mime_type: Some(mime_type.essence_str().to_string()),
            parents: Some(vec![self.folder_id.clone()]),
            description: Some(path.to_string()),
            ..File::default()
        };

        let result = self.runtime.block_on(async {
            self.hub
                .files()
                .create(metadata)
                .param("fields", "id,webViewLink")
                .supports_all_drives(true)
                .add_scope(Scope::File)
                .upload(Cursor::new(bytes), mime_type)
                .await
        });

        let (_, file) = result.map_err(|err| DriveOperationError::Backend(err.to_string()))?;
        let file_id = file.id.unwrap_or_default();
        debug!(%file_id, path, "document uploaded to drive");
        Ok(file
            .web_view_link
            .unwrap_or_else(|| format!("https://drive.google.com/file/d/{file_id}/view")))
    }
}

impl<C> std::fmt::Debug for DriveDocumentStorage<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveDocumentStorage")
            .field("folder_id", &self.folder_id)
            .finish_non_exhaustive()
    }
}

impl<C> DocumentStorage for DriveDocumentStorage<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        Ok(self.upload_file(path, bytes, content_type)?)
    }
}
