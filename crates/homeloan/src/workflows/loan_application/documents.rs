use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::domain::{DocumentKind, DocumentSlot, LocalDocument};

/// Where the picker should source a document from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickSource {
    ImageLibrary,
    Pdf,
}

/// Device document picker. `Ok(None)` means the user cancelled.
pub trait DocumentPicker {
    fn pick(
        &self,
        slot: DocumentSlot,
        source: PickSource,
    ) -> Result<Option<LocalDocument>, PickerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    #[error("permission to access the {0} was denied")]
    PermissionDenied(&'static str),
    #[error("document picker failed: {0}")]
    Failed(String),
}

/// Bytes and content type behind a local document reference, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Resolves a local URI to its bytes.
pub trait DocumentLoader: Send + Sync {
    fn load(&self, document: &LocalDocument) -> Result<LoadedDocument, DocumentLoadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentLoadError {
    #[error("unsupported document uri '{0}'")]
    UnsupportedUri(String),
    #[error("unable to read '{uri}': {source}")]
    Read {
        uri: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reads `file://` URIs and bare paths from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentLoader;

impl FsDocumentLoader {
    fn path_of(uri: &str) -> Result<PathBuf, DocumentLoadError> {
        if let Some(path) = uri.strip_prefix("file://") {
            return Ok(PathBuf::from(path));
        }
        if uri.contains("://") {
            return Err(DocumentLoadError::UnsupportedUri(uri.to_string()));
        }
        Ok(PathBuf::from(uri))
    }
}

impl DocumentLoader for FsDocumentLoader {
    fn load(&self, document: &LocalDocument) -> Result<LoadedDocument, DocumentLoadError> {
        let path = Self::path_of(&document.uri)?;
        let bytes = fs::read(&path).map_err(|source| DocumentLoadError::Read {
            uri: document.uri.clone(),
            source,
        })?;
        Ok(LoadedDocument {
            bytes,
            content_type: content_type_for(document),
        })
    }
}

/// MIME type guessed from the extension, falling back on the document kind.
pub fn content_type_for(document: &LocalDocument) -> String {
    match mime_guess::from_path(document.file_name()).first() {
        Some(guess) => guess.essence_str().to_string(),
        None => match document.kind() {
            DocumentKind::Pdf => mime::APPLICATION_PDF.essence_str().to_string(),
            DocumentKind::Image => mime::IMAGE_JPEG.essence_str().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension() {
        assert_eq!(
            LocalDocument::new("file:///docs/pan.PDF").kind(),
            DocumentKind::Pdf
        );
        assert_eq!(
            LocalDocument::new("file:///docs/pan.jpg").kind(),
            DocumentKind::Image
        );
        assert_eq!(
            LocalDocument::new("content://media/42").kind(),
            DocumentKind::Image
        );
    }

    #[test]
    fn content_type_prefers_extension() {
        assert_eq!(
            content_type_for(&LocalDocument::new("file:///docs/income.pdf")),
            "application/pdf"
        );
        assert_eq!(
            content_type_for(&LocalDocument::new("file:///docs/front.png")),
            "image/png"
        );
        assert_eq!(
            content_type_for(&LocalDocument::new("content://media/42")),
            "image/jpeg"
        );
    }

    #[test]
    fn fs_loader_reads_file_uris() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("proof.pdf");
        fs::write(&path, b"%PDF-1.4").expect("write fixture");

        let document = LocalDocument::new(format!("file://{}", path.display()));
        let loaded = FsDocumentLoader.load(&document).expect("loads");
        assert_eq!(loaded.bytes, b"%PDF-1.4");
        assert_eq!(loaded.content_type, "application/pdf");
    }

    #[test]
    fn fs_loader_rejects_remote_schemes() {
        let document = LocalDocument::new("https://example.in/proof.pdf");
        assert!(matches!(
            FsDocumentLoader.load(&document),
            Err(DocumentLoadError::UnsupportedUri(_))
        ));
    }
}
