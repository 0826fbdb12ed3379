use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::loan_application::documents::{
    DocumentLoadError, DocumentLoader, DocumentPicker, LoadedDocument, PickSource, PickerError,
};
use crate::workflows::loan_application::domain::{
    ApplicationRecord, DocumentSlot, Gender, LoanType, LocalDocument, Occupation, RecordId,
    SessionProfile, UserId,
};
use crate::workflows::loan_application::draft::MemoryDraftStore;
use crate::workflows::loan_application::repository::{
    ApplicationRecordStore, DocumentStorage, IdentityProvider, RecordStoreError, StorageError,
    UserIdentity,
};
use crate::workflows::loan_application::wizard::{
    Clock, FieldEdit, LoanApplicationWizard, WizardContext, WizardPolicy,
};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0)
        .single()
        .expect("valid timestamp")
}

#[derive(Default)]
pub(super) struct MemoryRecordStore {
    records: Mutex<Vec<(RecordId, String, ApplicationRecord)>>,
}

impl MemoryRecordStore {
    pub(super) fn records(&self) -> Vec<(RecordId, String, ApplicationRecord)> {
        self.records.lock().expect("record mutex poisoned").clone()
    }
}

impl ApplicationRecordStore for MemoryRecordStore {
    fn create(
        &self,
        collection: &str,
        mut record: ApplicationRecord,
    ) -> Result<RecordId, RecordStoreError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        let id = RecordId(format!("app-{}", guard.len() + 1));
        record.submitted_at = Some(fixed_now());
        guard.push((id.clone(), collection.to_string(), record));
        Ok(id)
    }

    fn list_for_user(
        &self,
        collection: &str,
        user_id: &UserId,
    ) -> Result<Vec<(RecordId, ApplicationRecord)>, RecordStoreError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard
            .iter()
            .filter(|(_, stored_in, record)| stored_in == collection && &record.user_id == user_id)
            .map(|(id, _, record)| (id.clone(), record.clone()))
            .collect())
    }
}

pub(super) struct UnavailableRecordStore;

impl ApplicationRecordStore for UnavailableRecordStore {
    fn create(
        &self,
        _collection: &str,
        _record: ApplicationRecord,
    ) -> Result<RecordId, RecordStoreError> {
        Err(RecordStoreError::Unavailable("offline".to_string()))
    }

    fn list_for_user(
        &self,
        _collection: &str,
        _user_id: &UserId,
    ) -> Result<Vec<(RecordId, ApplicationRecord)>, RecordStoreError> {
        Err(RecordStoreError::Unavailable("offline".to_string()))
    }
}

/// Storage fake that can fail on the Nth upload attempt (1-based).
#[derive(Default)]
pub(super) struct MemoryStorage {
    fail_on_attempt: Option<usize>,
    attempts: AtomicUsize,
    uploads: Mutex<Vec<(String, String)>>,
}

impl MemoryStorage {
    pub(super) fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on_attempt: Some(attempt),
            ..Self::default()
        }
    }

    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub(super) fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().expect("upload mutex poisoned").clone()
    }
}

impl DocumentStorage for MemoryStorage {
    fn upload(
        &self,
        path: &str,
        _bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_attempt == Some(attempt) {
            return Err(StorageError::Unavailable("connection reset".to_string()));
        }
        self.uploads
            .lock()
            .expect("upload mutex poisoned")
            .push((path.to_string(), content_type.to_string()));
        Ok(format!("https://storage.example.test/{path}"))
    }
}

pub(super) struct StaticIdentity(pub(super) Option<UserId>);

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.0.clone().map(|user_id| UserIdentity { user_id })
    }
}

/// Loader returning the URI bytes, tagged by document kind.
pub(super) struct EchoLoader;

impl DocumentLoader for EchoLoader {
    fn load(&self, document: &LocalDocument) -> Result<LoadedDocument, DocumentLoadError> {
        let content_type = match document.kind() {
            crate::workflows::loan_application::domain::DocumentKind::Pdf => "application/pdf",
            crate::workflows::loan_application::domain::DocumentKind::Image => "image/jpeg",
        };
        Ok(LoadedDocument {
            bytes: document.uri.as_bytes().to_vec(),
            content_type: content_type.to_string(),
        })
    }
}

pub(super) struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_now()
    }
}

pub(super) enum PickerOutcome {
    Picked(&'static str),
    Cancelled,
    Denied,
}

pub(super) struct ScriptedPicker(pub(super) PickerOutcome);

impl DocumentPicker for ScriptedPicker {
    fn pick(
        &self,
        _slot: DocumentSlot,
        _source: PickSource,
    ) -> Result<Option<LocalDocument>, PickerError> {
        match self.0 {
            PickerOutcome::Picked(uri) => Ok(Some(LocalDocument::new(uri))),
            PickerOutcome::Cancelled => Ok(None),
            PickerOutcome::Denied => Err(PickerError::PermissionDenied("photo library")),
        }
    }
}

pub(super) struct Harness {
    pub(super) drafts: Arc<MemoryDraftStore>,
    pub(super) storage: Arc<MemoryStorage>,
    pub(super) records: Arc<MemoryRecordStore>,
    pub(super) context: WizardContext,
}

pub(super) fn harness(user: Option<&str>, storage: MemoryStorage) -> Harness {
    harness_with_policy(user, storage, WizardPolicy::default())
}

pub(super) fn harness_with_policy(
    user: Option<&str>,
    storage: MemoryStorage,
    policy: WizardPolicy,
) -> Harness {
    let drafts = Arc::new(MemoryDraftStore::default());
    let storage = Arc::new(storage);
    let records = Arc::new(MemoryRecordStore::default());
    let identity = Arc::new(StaticIdentity(user.map(|id| UserId(id.to_string()))));
    let context = WizardContext::new(drafts.clone(), identity, storage.clone(), records.clone())
        .with_loader(Arc::new(EchoLoader))
        .with_clock(Arc::new(FixedClock))
        .with_policy(policy);

    Harness {
        drafts,
        storage,
        records,
        context,
    }
}

pub(super) fn mount(harness: &Harness, loan_type: LoanType) -> LoanApplicationWizard {
    let (wizard, _) =
        LoanApplicationWizard::mount(harness.context.clone(), loan_type, &SessionProfile::default());
    wizard
}

pub(super) fn fill_personal(wizard: &mut LoanApplicationWizard) {
    wizard.apply(FieldEdit::FullName("Priya Sharma".to_string()));
    wizard.apply(FieldEdit::DateOfBirth("15081990".to_string()));
    wizard.apply(FieldEdit::Gender(Gender::Female));
    wizard.apply(FieldEdit::Pan("abcde1234f".to_string()));
    wizard.apply(FieldEdit::Aadhaar("123412341234".to_string()));
}

pub(super) fn fill_contact(wizard: &mut LoanApplicationWizard) {
    wizard.apply(FieldEdit::Email("priya@example.in".to_string()));
    wizard.apply(FieldEdit::Phone("98765 43210".to_string()));
    wizard.apply(FieldEdit::CurrentAddress("12 MG Road, Pune".to_string()));
    wizard.apply(FieldEdit::SameAddress(true));
}

pub(super) fn fill_salaried_income(wizard: &mut LoanApplicationWizard) {
    wizard.apply(FieldEdit::Occupation(Occupation::Salaried));
    wizard.apply(FieldEdit::CompanyName("Infosys".to_string()));
    wizard.apply(FieldEdit::Industry("Information Technology".to_string()));
    wizard.apply(FieldEdit::MonthlyIncome("1,50,000".to_string()));
    wizard.apply(FieldEdit::YearsOfExperience("8".to_string()));
    wizard.apply(FieldEdit::HasExistingLoan(false));
}

pub(super) fn fill_loan(wizard: &mut LoanApplicationWizard) {
    wizard.apply(FieldEdit::LoanAmount("5000000".to_string()));
    wizard.apply(FieldEdit::TenureYears("20".to_string()));
    wizard.apply(FieldEdit::PropertyValue("7500000".to_string()));
}

pub(super) fn attach_documents(wizard: &mut LoanApplicationWizard, skip: Option<DocumentSlot>) {
    for slot in DocumentSlot::ALL {
        if Some(slot) == skip {
            continue;
        }
        let uri = match slot {
            DocumentSlot::IncomeProof | DocumentSlot::PropertyProof => "file:///docs/proof.pdf",
            _ => "file:///docs/card.jpg",
        };
        wizard
            .attach_document(
                &ScriptedPicker(PickerOutcome::Picked(uri)),
                slot,
                PickSource::ImageLibrary,
            )
            .expect("picker succeeds");
    }
}

/// Fill every step and walk forward to the documents step.
pub(super) fn walk_to_documents(wizard: &mut LoanApplicationWizard) {
    fill_personal(wizard);
    wizard.advance().expect("personal step advances");
    fill_contact(wizard);
    wizard.advance().expect("contact step advances");
    fill_salaried_income(wizard);
    wizard.advance().expect("income step advances");
    fill_loan(wizard);
    wizard.advance().expect("loan step advances");
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
