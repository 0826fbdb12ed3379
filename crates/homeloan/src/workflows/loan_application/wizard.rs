use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use super::alert::{Alert, Navigation};
use super::documents::{DocumentLoader, DocumentPicker, FsDocumentLoader, PickSource, PickerError};
use super::domain::{
    ApplicationForm, DocumentSlot, ExistingLoanType, Gender, LoanType, LocalDocument, Occupation,
    RecordId, SessionProfile, UserId, OTHER_CHOICE,
};
use super::draft::{merge_draft, snapshot, DraftStore, DRAFT_KEY};
use super::formatting::{
    format_aadhaar, format_amount, format_date_input, format_gst, format_pan, format_phone,
};
use super::geolocation::{GeolocationError, Geolocator};
use super::pipeline::{CommitError, SubmissionTransaction};
use super::repository::{
    ApplicationRecordStore, DocumentStorage, IdentityProvider, UserIdentity,
};
use super::suggestions::SuggestionField;
use super::validation::{
    validate_aadhaar, validate_date_of_birth, validate_email, validate_gst, validate_pan,
    validate_phone, FieldValidation, ValidationStatus,
};

/// Wizard steps, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Personal,
    Contact,
    Income,
    Loan,
    Documents,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::Personal;
    pub const LAST: WizardStep = WizardStep::Documents;

    pub const fn number(self) -> u8 {
        match self {
            WizardStep::Personal => 1,
            WizardStep::Contact => 2,
            WizardStep::Income => 3,
            WizardStep::Loan => 4,
            WizardStep::Documents => 5,
        }
    }

    pub fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(WizardStep::Personal),
            2 => Some(WizardStep::Contact),
            3 => Some(WizardStep::Income),
            4 => Some(WizardStep::Loan),
            5 => Some(WizardStep::Documents),
            _ => None,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            WizardStep::Personal => "Personal Details",
            WizardStep::Contact => "Contact Details",
            WizardStep::Income => "Income Details",
            WizardStep::Loan => "Loan Details",
            WizardStep::Documents => "Documents",
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn previous(self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }
}

/// Every field the wizard can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    FullName,
    DateOfBirth,
    Gender,
    Pan,
    Aadhaar,
    Email,
    Phone,
    AlternatePhone,
    CurrentAddress,
    SameAddress,
    PermanentAddress,
    Occupation,
    CompanyName,
    OtherCompanyName,
    Industry,
    OtherIndustry,
    MonthlyIncome,
    YearsOfExperience,
    Profession,
    ProfessionalIncome,
    YearsInProfession,
    BusinessName,
    NatureOfBusiness,
    AnnualTurnover,
    YearsInBusiness,
    GstNumber,
    HasExistingLoan,
    ExistingLoanTypes,
    TotalExistingEmi,
    LoanType,
    LoanAmount,
    TenureYears,
    PropertyValue,
    DeveloperName,
    OtherDeveloperName,
    SocietyName,
    Document(DocumentSlot),
}

impl FieldId {
    fn is_optional(self) -> bool {
        matches!(self, FieldId::AlternatePhone | FieldId::GstNumber)
    }
}

/// A single user edit. Text values pass through the field's formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    FullName(String),
    DateOfBirth(String),
    Gender(Gender),
    Pan(String),
    Aadhaar(String),
    Email(String),
    Phone(String),
    AlternatePhone(String),
    CurrentAddress(String),
    PermanentAddress(String),
    SameAddress(bool),
    Occupation(Occupation),
    CompanyName(String),
    OtherCompanyName(String),
    Industry(String),
    OtherIndustry(String),
    MonthlyIncome(String),
    YearsOfExperience(String),
    Profession(String),
    ProfessionalIncome(String),
    YearsInProfession(String),
    BusinessName(String),
    NatureOfBusiness(String),
    AnnualTurnover(String),
    YearsInBusiness(String),
    GstNumber(String),
    HasExistingLoan(bool),
    ToggleExistingLoanType(ExistingLoanType),
    TotalExistingEmi(String),
    LoanType(LoanType),
    LoanAmount(String),
    TenureYears(String),
    PropertyValue(String),
    DeveloperName(String),
    OtherDeveloperName(String),
    SocietyName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    InvalidFormat,
}

/// Advisory problem with a visible field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: FieldId,
    pub kind: IssueKind,
}

/// Behavior switches for the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardPolicy {
    /// Block `advance` while the current step has format errors.
    pub gate_on_format_errors: bool,
    /// Remote collection receiving submitted applications.
    pub collection: String,
}

impl Default for WizardPolicy {
    fn default() -> Self {
        Self {
            gate_on_format_errors: false,
            collection: "applications".to_string(),
        }
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Collaborators the wizard talks to.
#[derive(Clone)]
pub struct WizardContext {
    drafts: Arc<dyn DraftStore>,
    identity: Arc<dyn IdentityProvider>,
    storage: Arc<dyn DocumentStorage>,
    records: Arc<dyn ApplicationRecordStore>,
    loader: Arc<dyn DocumentLoader>,
    clock: Arc<dyn Clock>,
    policy: WizardPolicy,
}

impl WizardContext {
    pub fn new(
        drafts: Arc<dyn DraftStore>,
        identity: Arc<dyn IdentityProvider>,
        storage: Arc<dyn DocumentStorage>,
        records: Arc<dyn ApplicationRecordStore>,
    ) -> Self {
        Self {
            drafts,
            identity,
            storage,
            records,
            loader: Arc::new(FsDocumentLoader),
            clock: Arc::new(SystemClock),
            policy: WizardPolicy::default(),
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: WizardPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &WizardPolicy {
        &self.policy
    }
}

/// What happened while mounting the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountReport {
    pub restored_draft: bool,
    /// Fields where a session value replaced a different value from the draft.
    pub session_overrides: Vec<FieldId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved { step: WizardStep, draft_saved: bool },
    Submitted(SubmissionReceipt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved(WizardStep),
    /// Retreating from the first step leaves the wizard.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub record_id: RecordId,
    pub user_id: UserId,
}

impl SubmissionReceipt {
    pub fn alert(&self) -> Alert {
        Alert::new(
            "Success",
            "Your loan application has been submitted successfully.",
            Navigation::Home,
        )
    }
}

/// A submission whose preconditions passed; hand it back to `finish_submit`.
#[derive(Debug)]
pub struct PendingSubmission {
    identity: UserIdentity,
}

impl PendingSubmission {
    pub fn user_id(&self) -> &UserId {
        &self.identity.user_id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("missing documents: {}", slot_labels(.missing))]
    MissingDocuments { missing: Vec<DocumentSlot> },
    #[error("no signed-in user; login required")]
    LoginRequired,
    #[error("a submission is already in progress")]
    InProgress,
    #[error("submission failed: {0}")]
    Failed(#[from] CommitError),
}

fn slot_labels(slots: &[DocumentSlot]) -> String {
    slots
        .iter()
        .map(|slot| slot.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SubmitError {
    pub fn alert(&self) -> Alert {
        match self {
            SubmitError::MissingDocuments { missing } => Alert::new(
                "Missing Documents",
                format!("Please upload: {}", slot_labels(missing)),
                Navigation::Stay,
            ),
            SubmitError::LoginRequired => Alert::new(
                "Login Required",
                "Please log in to submit your application. Your progress has been saved.",
                Navigation::Login,
            ),
            SubmitError::InProgress => Alert::new(
                "Please Wait",
                "Your application is already being submitted.",
                Navigation::Stay,
            ),
            SubmitError::Failed(_) => Alert::new(
                "Error",
                "Failed to submit application. Please try again.",
                Navigation::Stay,
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{} field(s) on this step have format errors", .0.len())]
    InvalidFields(Vec<FieldIssue>),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Owns the step position and the application aggregate for one wizard session.
pub struct LoanApplicationWizard {
    context: WizardContext,
    step: WizardStep,
    form: ApplicationForm,
    suggestions: HashMap<SuggestionField, Vec<String>>,
    date_picker_visible: bool,
    submitting: bool,
}

impl LoanApplicationWizard {
    /// Start a wizard seeded with the caller's loan type, restoring any saved draft and
    /// then applying identity fields known from the session.
    pub fn mount(
        context: WizardContext,
        loan_type: LoanType,
        session: &SessionProfile,
    ) -> (Self, MountReport) {
        let defaults = ApplicationForm::seeded(loan_type);
        let mut report = MountReport::default();

        let mut form = match context.drafts.read(DRAFT_KEY) {
            Ok(Some(draft)) => match merge_draft(&defaults, draft) {
                Ok(form) => {
                    report.restored_draft = true;
                    form
                }
                Err(err) => {
                    warn!(error = %err, "ignoring unreadable application draft");
                    defaults
                }
            },
            Ok(None) => defaults,
            Err(err) => {
                warn!(error = %err, "draft store unavailable; starting a fresh application");
                defaults
            }
        };

        let overrides = [
            (FieldId::FullName, session.full_name.as_deref(), &mut form.personal.full_name),
            (FieldId::Phone, session.phone.as_deref(), &mut form.contact.phone),
            (
                FieldId::CurrentAddress,
                session.address.as_deref(),
                &mut form.contact.current_address,
            ),
        ];
        for (field, known, slot) in overrides {
            let Some(known) = known.map(str::trim).filter(|value| !value.is_empty()) else {
                continue;
            };
            if report.restored_draft && !slot.is_empty() && slot.as_str() != known {
                warn!(?field, "session identity overrides a different value from the draft");
                report.session_overrides.push(field);
            }
            *slot = known.to_string();
        }

        info!(
            restored_draft = report.restored_draft,
            loan_type = form.loan.loan_type.label(),
            "loan application wizard mounted"
        );

        let wizard = Self {
            context,
            step: WizardStep::FIRST,
            form,
            suggestions: HashMap::new(),
            date_picker_visible: false,
            submitting: false,
        };
        (wizard, report)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn date_picker_visible(&self) -> bool {
        self.date_picker_visible
    }

    pub fn suggestions(&self, field: SuggestionField) -> &[String] {
        self.suggestions
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        let form = &mut self.form;
        match edit {
            FieldEdit::FullName(value) => form.personal.full_name = value,
            FieldEdit::DateOfBirth(value) => form.personal.date_of_birth = format_date_input(&value),
            FieldEdit::Gender(value) => form.personal.gender = Some(value),
            FieldEdit::Pan(value) => form.personal.pan = format_pan(&value),
            FieldEdit::Aadhaar(value) => form.personal.aadhaar = format_aadhaar(&value),
            FieldEdit::Email(value) => form.contact.email = value.trim().to_string(),
            FieldEdit::Phone(value) => form.contact.phone = format_phone(&value),
            FieldEdit::AlternatePhone(value) => form.contact.alternate_phone = format_phone(&value),
            FieldEdit::CurrentAddress(value) => form.contact.current_address = value,
            FieldEdit::PermanentAddress(value) => form.contact.permanent_address = value,
            FieldEdit::SameAddress(value) => form.contact.is_same_address = value,
            FieldEdit::Occupation(value) => form.income.occupation = value,
            FieldEdit::CompanyName(value) => {
                self.refresh_suggestions(SuggestionField::Employer, &value);
                self.form.income.salaried.company_name = value;
            }
            FieldEdit::OtherCompanyName(value) => form.income.salaried.other_company_name = value,
            FieldEdit::Industry(value) => {
                self.refresh_suggestions(SuggestionField::Industry, &value);
                self.form.income.salaried.industry = value;
            }
            FieldEdit::OtherIndustry(value) => form.income.salaried.other_industry = value,
            FieldEdit::MonthlyIncome(value) => {
                form.income.salaried.monthly_income = format_amount(&value)
            }
            FieldEdit::YearsOfExperience(value) => {
                form.income.salaried.years_of_experience = format_amount(&value)
            }
            FieldEdit::Profession(value) => form.income.self_employed.profession = value,
            FieldEdit::ProfessionalIncome(value) => {
                form.income.self_employed.monthly_income = format_amount(&value)
            }
            FieldEdit::YearsInProfession(value) => {
                form.income.self_employed.years_in_profession = format_amount(&value)
            }
            FieldEdit::BusinessName(value) => form.income.business.business_name = value,
            FieldEdit::NatureOfBusiness(value) => form.income.business.nature_of_business = value,
            FieldEdit::AnnualTurnover(value) => {
                form.income.business.annual_turnover = format_amount(&value)
            }
            FieldEdit::YearsInBusiness(value) => {
                form.income.business.years_in_business = format_amount(&value)
            }
            FieldEdit::GstNumber(value) => form.income.business.gst_number = format_gst(&value),
            FieldEdit::HasExistingLoan(value) => form.income.obligations.has_existing_loan = value,
            FieldEdit::ToggleExistingLoanType(loan_type) => {
                let selected = &mut form.income.obligations.loan_types;
                if !selected.remove(&loan_type) {
                    selected.insert(loan_type);
                }
            }
            FieldEdit::TotalExistingEmi(value) => {
                form.income.obligations.total_emi = format_amount(&value)
            }
            FieldEdit::LoanType(value) => form.loan.loan_type = value,
            FieldEdit::LoanAmount(value) => form.loan.amount = format_amount(&value),
            FieldEdit::TenureYears(value) => form.loan.tenure_years = format_amount(&value),
            FieldEdit::PropertyValue(value) => form.loan.property_value = format_amount(&value),
            FieldEdit::DeveloperName(value) => {
                self.refresh_suggestions(SuggestionField::Developer, &value);
                self.form.loan.developer_name = value;
            }
            FieldEdit::OtherDeveloperName(value) => form.loan.other_developer_name = value,
            FieldEdit::SocietyName(value) => form.loan.society_name = value,
        }
    }

    fn refresh_suggestions(&mut self, field: SuggestionField, query: &str) {
        self.suggestions.insert(field, field.index().filter(query));
    }

    /// Focus (or an emptied input) shows the full list.
    pub fn focus_suggestions(&mut self, field: SuggestionField) {
        self.suggestions.insert(field, field.index().all());
    }

    pub fn select_suggestion(&mut self, field: SuggestionField, value: &str) {
        let value = value.to_string();
        match field {
            SuggestionField::Employer => self.form.income.salaried.company_name = value,
            SuggestionField::Industry => self.form.income.salaried.industry = value,
            SuggestionField::Developer => self.form.loan.developer_name = value,
        }
        self.suggestions.remove(&field);
    }

    pub fn show_date_picker(&mut self) {
        self.date_picker_visible = true;
    }

    pub fn dismiss_date_picker(&mut self) {
        self.date_picker_visible = false;
    }

    pub fn pick_date_of_birth(&mut self, date: NaiveDate) {
        self.form.personal.date_of_birth = date.format("%d/%m/%Y").to_string();
        self.date_picker_visible = false;
    }

    /// Fill the current address from the device location. On failure the field is left
    /// untouched and the error's alert should be shown.
    pub fn use_current_location(
        &mut self,
        geolocator: &dyn Geolocator,
    ) -> Result<String, GeolocationError> {
        let components = geolocator.current_address()?;
        let address = components.to_postal_address();
        if address.is_empty() {
            return Err(GeolocationError::Unavailable(
                "no address components returned".to_string(),
            ));
        }
        self.form.contact.current_address = address.clone();
        Ok(address)
    }

    /// Ask the picker for a document; `Ok(None)` when the user cancels.
    pub fn attach_document(
        &mut self,
        picker: &dyn DocumentPicker,
        slot: DocumentSlot,
        source: PickSource,
    ) -> Result<Option<LocalDocument>, PickerError> {
        let picked = picker.pick(slot, source)?;
        if let Some(document) = &picked {
            self.form.documents.set(slot, document.clone());
        }
        Ok(picked)
    }

    pub fn clear_document(&mut self, slot: DocumentSlot) -> Option<LocalDocument> {
        self.form.documents.clear(slot)
    }

    /// Fields disclosed on `step` for the current aggregate.
    pub fn visible_fields(&self, step: WizardStep) -> Vec<FieldId> {
        visible_fields(&self.form, step)
    }

    /// Advisory issues for the visible fields of `step`.
    pub fn step_issues(&self, step: WizardStep) -> Vec<FieldIssue> {
        let today = self.context.clock.now().date_naive();
        self.visible_fields(step)
            .into_iter()
            .filter_map(|field| field_issue(&self.form, field, today))
            .collect()
    }

    /// Move forward one step, autosaving the draft; on the last step this submits.
    pub fn advance(&mut self) -> Result<Transition, WizardError> {
        let Some(next) = self.step.next() else {
            let receipt = self.submit()?;
            return Ok(Transition::Submitted(receipt));
        };

        if self.context.policy.gate_on_format_errors {
            let blocking: Vec<FieldIssue> = self
                .step_issues(self.step)
                .into_iter()
                .filter(|issue| issue.kind == IssueKind::InvalidFormat)
                .collect();
            if !blocking.is_empty() {
                return Err(WizardError::InvalidFields(blocking));
            }
        }

        let draft_saved = self.save_draft();
        self.step = next;
        Ok(Transition::Moved {
            step: next,
            draft_saved,
        })
    }

    pub fn retreat(&mut self) -> Retreat {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                Retreat::Moved(previous)
            }
            None => Retreat::Exit,
        }
    }

    fn save_draft(&self) -> bool {
        let written = snapshot(&self.form)
            .and_then(|value| self.context.drafts.write(DRAFT_KEY, &value));
        match written {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, step = self.step.number(), "draft autosave failed");
                false
            }
        }
    }

    /// Upload every document and create the remote record, all or nothing.
    pub fn submit(&mut self) -> Result<SubmissionReceipt, SubmitError> {
        let pending = self.begin_submit()?;
        self.finish_submit(pending)
    }

    /// Check the submission preconditions and enter the loading state. The wizard reports
    /// `is_submitting()` and refuses a second submission until `finish_submit` runs.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitError> {
        if self.submitting {
            return Err(SubmitError::InProgress);
        }

        let missing = self.form.documents.missing();
        if !missing.is_empty() {
            return Err(SubmitError::MissingDocuments { missing });
        }

        let Some(identity) = self.context.identity.current_user() else {
            let draft_saved = self.save_draft();
            info!(draft_saved, "submission requires login; draft kept for resume");
            return Err(SubmitError::LoginRequired);
        };

        self.submitting = true;
        Ok(PendingSubmission { identity })
    }

    /// Run the upload pipeline and record creation for a begun submission, leaving the
    /// loading state whatever the outcome.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let PendingSubmission { identity } = pending;
        let clock = Arc::clone(&self.context.clock);
        let epoch_millis = move || clock.now().timestamp_millis();
        let transaction = SubmissionTransaction {
            loader: self.context.loader.as_ref(),
            storage: self.context.storage.as_ref(),
            records: self.context.records.as_ref(),
            collection: &self.context.policy.collection,
            clock: &epoch_millis,
        };
        let outcome = transaction.execute(&self.form, &identity.user_id);
        self.submitting = false;

        match outcome {
            Ok(record_id) => {
                if let Err(err) = self.context.drafts.delete(DRAFT_KEY) {
                    warn!(error = %err, "submitted application but could not clear the draft");
                }
                Ok(SubmissionReceipt {
                    record_id,
                    user_id: identity.user_id,
                })
            }
            Err(err) => {
                error!(error = %err, user_id = %identity.user_id, "application submission failed");
                Err(SubmitError::Failed(err))
            }
        }
    }
}

fn visible_fields(form: &ApplicationForm, step: WizardStep) -> Vec<FieldId> {
    match step {
        WizardStep::Personal => vec![
            FieldId::FullName,
            FieldId::DateOfBirth,
            FieldId::Gender,
            FieldId::Pan,
            FieldId::Aadhaar,
        ],
        WizardStep::Contact => {
            let mut fields = vec![
                FieldId::Email,
                FieldId::Phone,
                FieldId::AlternatePhone,
                FieldId::CurrentAddress,
                FieldId::SameAddress,
            ];
            if !form.contact.is_same_address {
                fields.push(FieldId::PermanentAddress);
            }
            fields
        }
        WizardStep::Income => {
            let income = &form.income;
            let mut fields = vec![FieldId::Occupation];
            match income.occupation {
                Occupation::Salaried => {
                    fields.push(FieldId::CompanyName);
                    if income.salaried.company_name == OTHER_CHOICE {
                        fields.push(FieldId::OtherCompanyName);
                    }
                    fields.push(FieldId::Industry);
                    if income.salaried.industry == OTHER_CHOICE {
                        fields.push(FieldId::OtherIndustry);
                    }
                    fields.extend([FieldId::MonthlyIncome, FieldId::YearsOfExperience]);
                }
                Occupation::SelfEmployed => fields.extend([
                    FieldId::Profession,
                    FieldId::ProfessionalIncome,
                    FieldId::YearsInProfession,
                ]),
                Occupation::Business => fields.extend([
                    FieldId::BusinessName,
                    FieldId::NatureOfBusiness,
                    FieldId::AnnualTurnover,
                    FieldId::YearsInBusiness,
                    FieldId::GstNumber,
                ]),
            }
            fields.push(FieldId::HasExistingLoan);
            if income.obligations.has_existing_loan {
                fields.extend([FieldId::ExistingLoanTypes, FieldId::TotalExistingEmi]);
            }
            fields
        }
        WizardStep::Loan => {
            let mut fields = vec![
                FieldId::LoanType,
                FieldId::LoanAmount,
                FieldId::TenureYears,
                FieldId::PropertyValue,
            ];
            if form.loan.loan_type == LoanType::FlatBuying {
                fields.push(FieldId::DeveloperName);
                if form.loan.developer_name == OTHER_CHOICE {
                    fields.push(FieldId::OtherDeveloperName);
                }
                fields.push(FieldId::SocietyName);
            }
            fields
        }
        WizardStep::Documents => DocumentSlot::ALL
            .into_iter()
            .map(FieldId::Document)
            .collect(),
    }
}

fn text_value(form: &ApplicationForm, field: FieldId) -> Option<&str> {
    let value = match field {
        FieldId::FullName => &form.personal.full_name,
        FieldId::DateOfBirth => &form.personal.date_of_birth,
        FieldId::Pan => &form.personal.pan,
        FieldId::Aadhaar => &form.personal.aadhaar,
        FieldId::Email => &form.contact.email,
        FieldId::Phone => &form.contact.phone,
        FieldId::AlternatePhone => &form.contact.alternate_phone,
        FieldId::CurrentAddress => &form.contact.current_address,
        FieldId::PermanentAddress => &form.contact.permanent_address,
        FieldId::CompanyName => &form.income.salaried.company_name,
        FieldId::OtherCompanyName => &form.income.salaried.other_company_name,
        FieldId::Industry => &form.income.salaried.industry,
        FieldId::OtherIndustry => &form.income.salaried.other_industry,
        FieldId::MonthlyIncome => &form.income.salaried.monthly_income,
        FieldId::YearsOfExperience => &form.income.salaried.years_of_experience,
        FieldId::Profession => &form.income.self_employed.profession,
        FieldId::ProfessionalIncome => &form.income.self_employed.monthly_income,
        FieldId::YearsInProfession => &form.income.self_employed.years_in_profession,
        FieldId::BusinessName => &form.income.business.business_name,
        FieldId::NatureOfBusiness => &form.income.business.nature_of_business,
        FieldId::AnnualTurnover => &form.income.business.annual_turnover,
        FieldId::YearsInBusiness => &form.income.business.years_in_business,
        FieldId::GstNumber => &form.income.business.gst_number,
        FieldId::TotalExistingEmi => &form.income.obligations.total_emi,
        FieldId::LoanAmount => &form.loan.amount,
        FieldId::TenureYears => &form.loan.tenure_years,
        FieldId::PropertyValue => &form.loan.property_value,
        FieldId::DeveloperName => &form.loan.developer_name,
        FieldId::OtherDeveloperName => &form.loan.other_developer_name,
        FieldId::SocietyName => &form.loan.society_name,
        FieldId::Gender
        | FieldId::SameAddress
        | FieldId::Occupation
        | FieldId::HasExistingLoan
        | FieldId::ExistingLoanTypes
        | FieldId::LoanType
        | FieldId::Document(_) => return None,
    };
    Some(value.as_str())
}

fn field_issue(form: &ApplicationForm, field: FieldId, today: NaiveDate) -> Option<FieldIssue> {
    let issue = |kind| Some(FieldIssue { field, kind });

    match field {
        FieldId::Gender if form.personal.gender.is_none() => return issue(IssueKind::Missing),
        FieldId::ExistingLoanTypes if form.income.obligations.loan_types.is_empty() => {
            return issue(IssueKind::Missing)
        }
        FieldId::Document(slot) if form.documents.get(slot).is_none() => {
            return issue(IssueKind::Missing)
        }
        _ => {}
    }

    let value = text_value(form, field)?.trim();
    if value.is_empty() {
        return if field.is_optional() {
            None
        } else {
            issue(IssueKind::Missing)
        };
    }

    let check: Option<FieldValidation> = match field {
        FieldId::Pan => Some(validate_pan(value)),
        FieldId::Aadhaar => Some(validate_aadhaar(value)),
        FieldId::DateOfBirth => Some(validate_date_of_birth(value, today)),
        FieldId::Phone | FieldId::AlternatePhone => Some(validate_phone(value)),
        FieldId::Email => Some(validate_email(value)),
        FieldId::GstNumber => Some(validate_gst(value)),
        _ => None,
    };

    match check.map(|check| check.status) {
        Some(ValidationStatus::Invalid) => issue(IssueKind::InvalidFormat),
        Some(ValidationStatus::Incomplete) => issue(IssueKind::Missing),
        _ => None,
    }
}
