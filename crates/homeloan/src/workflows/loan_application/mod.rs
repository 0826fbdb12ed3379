//! Multi-step home loan application: identity validation, draft autosave, document
//! collection and the all-or-nothing submission pipeline.

pub mod alert;
pub mod assembler;
pub mod documents;
pub mod domain;
pub mod draft;
pub mod drive;
pub mod formatting;
pub mod geolocation;
pub mod pipeline;
pub mod repository;
pub mod router;
pub mod suggestions;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use alert::{Alert, Navigation};
pub use assembler::{assemble_record, UploadedDocuments};
pub use documents::{
    DocumentLoadError, DocumentLoader, DocumentPicker, FsDocumentLoader, LoadedDocument,
    PickSource, PickerError,
};
pub use domain::{
    ApplicationForm, ApplicationRecord, ApplicationStatus, ApplicationStatusView, DocumentKind,
    DocumentSlot, ExistingLoanType, Gender, IncomeDetails, LoanPurpose, LoanType, LocalDocument,
    Occupation, RecordId, SessionProfile, UserId, OTHER_CHOICE,
};
pub use draft::{DraftStore, DraftStoreError, FileDraftStore, MemoryDraftStore, DRAFT_KEY};
pub use drive::{DriveDocumentStorage, DriveOperationError};
pub use geolocation::{AddressComponents, GeolocationError, Geolocator};
pub use pipeline::{upload_path, CommitError, UploadError};
pub use repository::{
    ApplicationRecordStore, DocumentStorage, IdentityProvider, RecordStoreError, StorageError,
    UserIdentity,
};
pub use router::calculator_router;
pub use suggestions::{SuggestionField, SuggestionIndex};
pub use validation::{FieldValidation, ValidationStatus};
pub use wizard::{
    Clock, FieldEdit, FieldId, FieldIssue, IssueKind, LoanApplicationWizard, MountReport,
    PendingSubmission, Retreat, SubmissionReceipt, SubmitError, SystemClock, Transition,
    WizardContext, WizardError, WizardPolicy, WizardStep,
};
