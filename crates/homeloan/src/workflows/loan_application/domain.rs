use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the authenticated applicant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned by the remote record store to a created application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

/// Literal choice that discloses a free-text override field.
pub const OTHER_CHOICE: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Occupation category selecting which income sub-schema is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupation {
    #[default]
    Salaried,
    #[serde(rename = "Self-Employed")]
    SelfEmployed,
    Business,
}

impl Occupation {
    pub const fn label(self) -> &'static str {
        match self {
            Occupation::Salaried => "Salaried",
            Occupation::SelfEmployed => "Self-Employed",
            Occupation::Business => "Business",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    #[default]
    Construction,
    Renovation,
    #[serde(rename = "Flat Buying")]
    FlatBuying,
    #[serde(rename = "LAP")]
    LoanAgainstProperty,
}

impl LoanType {
    pub const ALL: [LoanType; 4] = [
        LoanType::Construction,
        LoanType::Renovation,
        LoanType::FlatBuying,
        LoanType::LoanAgainstProperty,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LoanType::Construction => "Construction",
            LoanType::Renovation => "Renovation",
            LoanType::FlatBuying => "Flat Buying",
            LoanType::LoanAgainstProperty => "LAP",
        }
    }

    /// Parse the label used by navigation callers; unknown labels yield `None`.
    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|loan_type| loan_type.label().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExistingLoanType {
    #[serde(rename = "Home Loan")]
    HomeLoan,
    #[serde(rename = "Personal Loan")]
    PersonalLoan,
    #[serde(rename = "Car Loan")]
    CarLoan,
    #[serde(rename = "Education Loan")]
    EducationLoan,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Gold Loan")]
    GoldLoan,
}

/// Identity block of the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalDetails {
    pub full_name: String,
    /// `DD/MM/YYYY`
    pub date_of_birth: String,
    pub gender: Option<Gender>,
    pub pan: String,
    /// Grouped display form, `1234 5678 9012`.
    pub aadhaar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub alternate_phone: String,
    pub current_address: String,
    pub permanent_address: String,
    pub is_same_address: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalariedForm {
    pub company_name: String,
    pub other_company_name: String,
    pub industry: String,
    pub other_industry: String,
    pub monthly_income: String,
    pub years_of_experience: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfEmployedForm {
    pub profession: String,
    pub monthly_income: String,
    pub years_in_profession: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessForm {
    pub business_name: String,
    pub nature_of_business: String,
    pub annual_turnover: String,
    pub years_in_business: String,
    pub gst_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObligationsForm {
    pub has_existing_loan: bool,
    pub loan_types: BTreeSet<ExistingLoanType>,
    pub total_emi: String,
}

/// Income step. All three sub-schemas are retained so switching occupation hides data
/// instead of erasing it; only the active one reaches the final record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeForm {
    pub occupation: Occupation,
    pub salaried: SalariedForm,
    pub self_employed: SelfEmployedForm,
    pub business: BusinessForm,
    pub obligations: ObligationsForm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanForm {
    pub loan_type: LoanType,
    pub amount: String,
    pub tenure_years: String,
    pub property_value: String,
    pub developer_name: String,
    pub other_developer_name: String,
    pub society_name: String,
}

/// One of the six named upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    PanFront,
    PanBack,
    AadhaarFront,
    AadhaarBack,
    IncomeProof,
    PropertyProof,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 6] = [
        DocumentSlot::PanFront,
        DocumentSlot::PanBack,
        DocumentSlot::AadhaarFront,
        DocumentSlot::AadhaarBack,
        DocumentSlot::IncomeProof,
        DocumentSlot::PropertyProof,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            DocumentSlot::PanFront => "pan_front",
            DocumentSlot::PanBack => "pan_back",
            DocumentSlot::AadhaarFront => "aadhaar_front",
            DocumentSlot::AadhaarBack => "aadhaar_back",
            DocumentSlot::IncomeProof => "income_proof",
            DocumentSlot::PropertyProof => "property_proof",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DocumentSlot::PanFront => "PAN card (front)",
            DocumentSlot::PanBack => "PAN card (back)",
            DocumentSlot::AadhaarFront => "Aadhaar card (front)",
            DocumentSlot::AadhaarBack => "Aadhaar card (back)",
            DocumentSlot::IncomeProof => "Income proof",
            DocumentSlot::PropertyProof => "Property proof",
        }
    }
}

/// Kind of a picked file, inferred from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Image,
    Pdf,
}

/// Device-local reference to a picked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDocument {
    pub uri: String,
}

impl LocalDocument {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn kind(&self) -> DocumentKind {
        let path = self.uri.split(['?', '#']).next().unwrap_or_default();
        let is_pdf = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            DocumentKind::Pdf
        } else {
            DocumentKind::Image
        }
    }

    /// File name portion of the URI, used for display.
    pub fn file_name(&self) -> &str {
        self.uri.rsplit('/').next().unwrap_or(&self.uri)
    }
}

/// Fixed map of the six document slots; absent entries are empty slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSlots(BTreeMap<DocumentSlot, LocalDocument>);

impl DocumentSlots {
    pub fn get(&self, slot: DocumentSlot) -> Option<&LocalDocument> {
        self.0.get(&slot)
    }

    pub fn set(&mut self, slot: DocumentSlot, document: LocalDocument) {
        self.0.insert(slot, document);
    }

    pub fn clear(&mut self, slot: DocumentSlot) -> Option<LocalDocument> {
        self.0.remove(&slot)
    }

    /// Empty slots in fixed slot order.
    pub fn missing(&self) -> Vec<DocumentSlot> {
        DocumentSlot::ALL
            .into_iter()
            .filter(|slot| !self.0.contains_key(slot))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Populated slots in fixed slot order.
    pub fn populated(&self) -> impl Iterator<Item = (DocumentSlot, &LocalDocument)> {
        DocumentSlot::ALL
            .into_iter()
            .filter_map(|slot| self.0.get(&slot).map(|document| (slot, document)))
    }
}

/// The in-memory aggregate for one in-progress application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    pub personal: PersonalDetails,
    pub contact: ContactDetails,
    pub income: IncomeForm,
    pub loan: LoanForm,
    pub documents: DocumentSlots,
}

impl ApplicationForm {
    /// Defaults for a freshly mounted wizard, seeded with the caller's loan type.
    pub fn seeded(loan_type: LoanType) -> Self {
        let mut form = Self::default();
        form.loan.loan_type = loan_type;
        form
    }
}

/// Identity fields already known from the signed-in session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Lifecycle state stamped on created records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    #[serde(rename = "Under Review")]
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

/// Contact block as persisted; `permanent_address` is resolved, not raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub email: String,
    pub phone: String,
    pub alternate_phone: String,
    pub current_address: String,
    pub permanent_address: String,
    pub is_same_address: bool,
}

/// Income sub-schema of the active occupation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "occupation")]
pub enum IncomeDetails {
    Salaried {
        employer_name: String,
        industry: String,
        monthly_income: String,
        years_of_experience: String,
    },
    #[serde(rename = "Self-Employed")]
    SelfEmployed {
        profession: String,
        monthly_income: String,
        years_in_profession: String,
    },
    Business {
        business_name: String,
        nature_of_business: String,
        annual_turnover: String,
        years_in_business: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        gst_number: Option<String>,
    },
}

impl IncomeDetails {
    pub fn occupation(&self) -> Occupation {
        match self {
            IncomeDetails::Salaried { .. } => Occupation::Salaried,
            IncomeDetails::SelfEmployed { .. } => Occupation::SelfEmployed,
            IncomeDetails::Business { .. } => Occupation::Business,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingObligations {
    pub has_existing_loan: bool,
    pub loan_types: BTreeSet<ExistingLoanType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_emi: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "loan_type")]
pub enum LoanPurpose {
    Construction,
    Renovation,
    #[serde(rename = "Flat Buying")]
    FlatBuying {
        developer_name: String,
        society_name: String,
    },
    #[serde(rename = "LAP")]
    LoanAgainstProperty,
}

impl LoanPurpose {
    pub fn loan_type(&self) -> LoanType {
        match self {
            LoanPurpose::Construction => LoanType::Construction,
            LoanPurpose::Renovation => LoanType::Renovation,
            LoanPurpose::FlatBuying { .. } => LoanType::FlatBuying,
            LoanPurpose::LoanAgainstProperty => LoanType::LoanAgainstProperty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDetails {
    pub amount: String,
    pub tenure_years: String,
    pub property_value: String,
    pub purpose: LoanPurpose,
}

/// Final record shape written to the remote application collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub user_id: UserId,
    pub status: ApplicationStatus,
    pub personal: PersonalDetails,
    pub contact: ContactRecord,
    pub income: IncomeDetails,
    pub obligations: ExistingObligations,
    pub loan: LoanDetails,
    pub docs: BTreeMap<DocumentSlot, String>,
    /// Assigned by the record store when the record is created.
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ApplicationRecord {
    pub fn status_view(&self, record_id: &RecordId) -> ApplicationStatusView {
        ApplicationStatusView {
            record_id: record_id.clone(),
            status: self.status.label(),
            loan_type: self.loan.purpose.loan_type().label(),
            amount: self.loan.amount.clone(),
            submitted_at: self.submitted_at,
        }
    }
}

/// Summary row for an applicant's list of submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationStatusView {
    pub record_id: RecordId,
    pub status: &'static str,
    pub loan_type: &'static str,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}
