use chrono::{DateTime, Utc};
use homeloan::workflows::loan_application::{
    AddressComponents, ApplicationRecord, ApplicationRecordStore, DocumentLoadError,
    DocumentLoader, DocumentPicker, DocumentSlot, DocumentStorage, GeolocationError, Geolocator,
    IdentityProvider, LoadedDocument, LocalDocument, PickSource, PickerError, RecordId,
    RecordStoreError, StorageError, UserId, UserIdentity,
};
use homeloan::workflows::loan_application::documents::content_type_for;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    records: Arc<Mutex<BTreeMap<String, (RecordId, ApplicationRecord)>>>,
}

impl ApplicationRecordStore for InMemoryRecordStore {
    fn create(
        &self,
        collection: &str,
        mut record: ApplicationRecord,
    ) -> Result<RecordId, RecordStoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RecordStoreError::Unavailable("record mutex poisoned".to_string()))?;
        let id = RecordId(format!("{collection}-{:04}", guard.len() + 1));
        record.submitted_at = Some(Utc::now());
        guard.insert(format!("{collection}/{}", id.0), (id.clone(), record));
        Ok(id)
    }

    fn list_for_user(
        &self,
        collection: &str,
        user_id: &UserId,
    ) -> Result<Vec<(RecordId, ApplicationRecord)>, RecordStoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RecordStoreError::Unavailable("record mutex poisoned".to_string()))?;
        let prefix = format!("{collection}/");
        Ok(guard
            .iter()
            .filter(|(key, (_, record))| key.starts_with(&prefix) && &record.user_id == user_id)
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}

/// Keeps uploaded bytes in memory; can be told to fail the Nth upload.
#[derive(Default)]
pub(crate) struct InMemoryDocumentStorage {
    fail_on_attempt: Option<usize>,
    attempts: AtomicUsize,
    objects: Mutex<BTreeMap<String, (String, usize)>>,
}

impl InMemoryDocumentStorage {
    pub(crate) fn failing_on(attempt: Option<usize>) -> Self {
        Self {
            fail_on_attempt: attempt,
            ..Self::default()
        }
    }

    pub(crate) fn object_count(&self) -> usize {
        self.objects.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl DocumentStorage for InMemoryDocumentStorage {
    fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_attempt == Some(attempt) {
            return Err(StorageError::Unavailable(format!(
                "simulated outage on upload {attempt}"
            )));
        }
        let mut guard = self
            .objects
            .lock()
            .map_err(|_| StorageError::Unavailable("storage mutex poisoned".to_string()))?;
        guard.insert(path.to_string(), (content_type.to_string(), bytes.len()));
        Ok(format!("memory://documents/{path}"))
    }
}

pub(crate) struct StaticIdentity(pub(crate) Option<UserId>);

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.0.clone().map(|user_id| UserIdentity { user_id })
    }
}

/// Produces placeholder bytes instead of touching the filesystem.
pub(crate) struct SyntheticDocumentLoader;

impl DocumentLoader for SyntheticDocumentLoader {
    fn load(&self, document: &LocalDocument) -> Result<LoadedDocument, DocumentLoadError> {
        Ok(LoadedDocument {
            bytes: format!("demo:{}", document.uri).into_bytes(),
            content_type: content_type_for(document),
        })
    }
}

/// Picker returning a fixed device URI per slot.
pub(crate) struct DemoPicker;

impl DocumentPicker for DemoPicker {
    fn pick(
        &self,
        slot: DocumentSlot,
        source: PickSource,
    ) -> Result<Option<LocalDocument>, PickerError> {
        let extension = match source {
            PickSource::Pdf => "pdf",
            PickSource::ImageLibrary => "jpg",
        };
        Ok(Some(LocalDocument::new(format!(
            "file:///device/documents/{}.{extension}",
            slot.key()
        ))))
    }
}

pub(crate) struct DemoLocator;

impl Geolocator for DemoLocator {
    fn current_address(&self) -> Result<AddressComponents, GeolocationError> {
        Ok(AddressComponents {
            name: Some("Flat 302, Sai Residency".to_string()),
            street: Some("Baner Road".to_string()),
            city: Some("Pune".to_string()),
            region: Some("Maharashtra".to_string()),
            postal_code: Some("411045".to_string()),
            country: Some("India".to_string()),
            ..AddressComponents::default()
        })
    }
}

pub(crate) fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "pending".to_string())
}
