use std::sync::Arc;

use super::common::*;

use crate::workflows::loan_application::alert::Navigation;
use crate::workflows::loan_application::domain::{
    ApplicationStatus, DocumentSlot, IncomeDetails, LoanPurpose, LoanType, Occupation,
    SessionProfile, UserId,
};
use crate::workflows::loan_application::draft::{DraftStore, MemoryDraftStore, DRAFT_KEY};
use crate::workflows::loan_application::pipeline::{CommitError, UploadError};
use crate::workflows::loan_application::repository::ApplicationRecordStore;
use crate::workflows::loan_application::wizard::{
    FieldEdit, LoanApplicationWizard, SubmitError, Transition, WizardContext, WizardError,
    WizardStep,
};

#[test]
fn other_employer_is_replaced_by_override_text() {
    let harness = harness(Some("uid-42"), MemoryStorage::default());
    let mut wizard = mount(&harness, LoanType::Construction);
    walk_to_documents(&mut wizard);
    wizard.retreat();
    wizard.retreat();
    wizard.apply(FieldEdit::CompanyName("Other".to_string()));
    wizard.apply(FieldEdit::OtherCompanyName("Acme Fintech".to_string()));
    wizard.advance().expect("income");
    wizard.advance().expect("loan");
    attach_documents(&mut wizard, None);

    let receipt = match wizard.advance().expect("submits") {
        Transition::Submitted(receipt) => receipt,
        other => panic!("expected submission, got {other:?}"),
    };

    let records = harness.records.records();
    assert_eq!(records.len(), 1);
    let (record_id, collection, record) = &records[0];
    assert_eq!(record_id, &receipt.record_id);
    assert_eq!(collection, "applications");
    match &record.income {
        IncomeDetails::Salaried {
            employer_name,
            industry,
            monthly_income,
            ..
        } => {
            assert_eq!(employer_name, "Acme Fintech");
            assert_eq!(industry, "Information Technology");
            assert_eq!(monthly_income, "150000");
        }
        other => panic!("expected salaried income, got {other:?}"),
    }
}

#[test]
fn successful_submission_uploads_every_slot_and_clears_draft() {
    let harness = harness(Some("uid-42"), MemoryStorage::default());
    let mut wizard = mount(&harness, LoanType::Construction);
    walk_to_documents(&mut wizard);
    attach_documents(&mut wizard, None);
    assert!(harness.drafts.read(DRAFT_KEY).expect("read").is_some());

    let receipt = wizard.submit().expect("submitted");
    assert_eq!(receipt.user_id, UserId("uid-42".to_string()));
    let alert = receipt.alert();
    assert_eq!(alert.title, "Success");
    assert_eq!(alert.on_acknowledge, Navigation::Home);

    let uploads = harness.storage.uploads();
    assert_eq!(uploads.len(), 6);
    assert_eq!(
        uploads[0].0,
        format!(
            "applications/uid-42/uid-42_pan_front_{}",
            fixed_now().timestamp_millis()
        )
    );
    assert_eq!(uploads[4].1, "application/pdf");

    let (_, _, record) = &harness.records.records()[0];
    assert_eq!(record.status, ApplicationStatus::Pending);
    assert_eq!(record.user_id, UserId("uid-42".to_string()));
    assert_eq!(record.docs.len(), 6);
    assert!(record.docs[&DocumentSlot::PropertyProof].starts_with("https://storage.example.test/"));
    assert_eq!(record.contact.permanent_address, "12 MG Road, Pune");
    assert_eq!(record.contact.email, "priya@example.in");
    assert!(!record.obligations.has_existing_loan);
    assert!(record.obligations.total_emi.is_none());
    assert_eq!(record.loan.purpose, LoanPurpose::Construction);
    assert!(record.submitted_at.is_some());
    assert!(!wizard.is_submitting());

    assert!(harness.drafts.read(DRAFT_KEY).expect("read").is_none());
}

#[test]
fn five_of_six_documents_reports_the_missing_slot() {
    let harness = harness(Some("uid-42"), MemoryStorage::default());
    let mut wizard = mount(&harness, LoanType::Construction);
    walk_to_documents(&mut wizard);
    attach_documents(&mut wizard, Some(DocumentSlot::AadhaarBack));

    let err = wizard.advance().expect_err("missing document");
    match &err {
        WizardError::Submit(SubmitError::MissingDocuments { missing }) => {
            assert_eq!(missing, &vec![DocumentSlot::AadhaarBack]);
        }
        other => panic!("expected missing documents, got {other:?}"),
    }
    if let WizardError::Submit(submit) = &err {
        let alert = submit.alert();
        assert_eq!(alert.title, "Missing Documents");
        assert!(alert.message.contains("Aadhaar card (back)"));
    }

    assert_eq!(wizard.step(), WizardStep::Documents);
    assert_eq!(harness.storage.attempts(), 0);
    assert!(harness.records.records().is_empty());
}

#[test]
fn unauthenticated_submission_requires_login_and_keeps_draft() {
    let harness = harness(None, MemoryStorage::default());
    let mut wizard = mount(&harness, LoanType::Construction);
    walk_to_documents(&mut wizard);
    attach_documents(&mut wizard, None);
    let draft_before = harness.drafts.read(DRAFT_KEY).expect("read");

    let err = wizard.submit().expect_err("login required");
    assert!(matches!(err, SubmitError::LoginRequired));
    let alert = err.alert();
    assert_eq!(alert.title, "Login Required");
    assert_eq!(alert.on_acknowledge, Navigation::Login);

    assert_eq!(harness.storage.attempts(), 0);
    assert!(harness.records.records().is_empty());
    assert!(draft_before.is_some());
    let kept = harness.drafts.read(DRAFT_KEY).expect("read").expect("draft kept");
    assert_eq!(kept["documents"].as_object().map(|slots| slots.len()), Some(6));
    assert!(!wizard.is_submitting());
}

#[test]
fn returning_from_login_restores_every_field_and_document() {
    let harness = harness(None, MemoryStorage::default());
    let mut wizard = mount(&harness, LoanType::Construction);
    walk_to_documents(&mut wizard);
    attach_documents(&mut wizard, None);
    let before = wizard.form().clone();

    let err = wizard.submit().expect_err("login required");
    assert!(matches!(err, SubmitError::LoginRequired));
    drop(wizard);

    let session = SessionProfile {
        full_name: Some("Priya Sharma".to_string()),
        phone: Some("9876543210".to_string()),
        address: Some("12 MG Road, Pune".to_string()),
    };
    let (resumed, report) =
        LoanApplicationWizard::mount(harness.context.clone(), LoanType::Construction, &session);
    assert!(report.restored_draft);
    assert!(report.session_overrides.is_empty());
    assert!(resumed.form().documents.missing().is_empty());

    let mut expected = before;
    expected.contact.email.clear();
    assert_eq!(resumed.form(), &expected);
}

#[test]
fn begun_submission_holds_the_loading_state_until_finished() {
    let harness = harness(Some("uid-42"), MemoryStorage::default());
    let mut wizard = mount(&harness, LoanType::Construction);
    walk_to_documents(&mut wizard);
    attach_documents(&mut wizard, None);

    let pending = wizard.begin_submit().expect("preconditions hold");
    assert_eq!(pending.user_id(), &UserId("uid-42".to_string()));
    assert!(wizard.is_submitting());

    let again = wizard.submit().expect_err("re-entrant submit");
    assert!(matches!(again, SubmitError::InProgress));
    assert_eq!(again.alert().on_acknowledge, Navigation::Stay);
    assert!(matches!(
        wizard.advance(),
        Err(WizardError::Submit(SubmitError::InProgress))
    ));
    assert_eq!(harness.storage.attempts(), 0);

    let receipt = wizard.finish_submit(pending).expect("submitted");
    assert_eq!(receipt.record_id.0, "app-1");
    assert!(!wizard.is_submitting());
    assert_eq!(harness.records.records().len(), 1);
    assert_eq!(harness.storage.uploads().len(), 6);
}

#[test]
fn failed_finish_leaves_the_loading_state() {
    let harness = harness(Some("uid-42"), MemoryStorage::failing_on(1));
    let mut wizard = mount(&harness, LoanType::Construction);
    walk_to_documents(&mut wizard);
    attach_documents(&mut wizard, None);

    let pending = wizard.begin_submit().expect("preconditions hold");
    assert!(wizard.is_submitting());
    wizard.finish_submit(pending).expect_err("first upload fails");
    assert!(!wizard.is_submitting());
    assert!(wizard.begin_submit().is_ok());
}

#[test]
fn third_upload_failure_creates_no_record_and_keeps_draft() {
    let harness = harness(Some("uid-42"), MemoryStorage::failing_on(3));
    let mut wizard = mount(&harness, LoanType::Construction);
    walk_to_documents(&mut wizard);
    attach_documents(&mut wizard, None);

    let err = wizard.submit().expect_err("upload fails");
    match &err {
        SubmitError::Failed(CommitError::Upload(UploadError::Storage { slot, .. })) => {
            assert_eq!(*slot, DocumentSlot::AadhaarFront);
        }
        other => panic!("expected storage failure, got {other:?}"),
    }
    let alert = err.alert();
    assert_eq!(alert.title, "Error");
    assert_eq!(alert.message, "Failed to submit application. Please try again.");

    assert_eq!(harness.storage.attempts(), 3);
    assert_eq!(harness.storage.uploads().len(), 2);
    assert!(harness.records.records().is_empty());
    assert!(harness.drafts.read(DRAFT_KEY).expect("read").is_some());
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.step(), WizardStep::Documents);
}

#[test]
fn record_store_failure_surfaces_generic_error() {
    let drafts = Arc::new(MemoryDraftStore::default());
    let storage = Arc::new(MemoryStorage::default());
    let context = WizardContext::new(
        drafts.clone(),
        Arc::new(StaticIdentity(Some(UserId("uid-9".to_string())))),
        storage.clone(),
        Arc::new(UnavailableRecordStore),
    )
    .with_loader(Arc::new(EchoLoader))
    .with_clock(Arc::new(FixedClock));
    let (mut wizard, _) = crate::workflows::loan_application::wizard::LoanApplicationWizard::mount(
        context,
        LoanType::Renovation,
        &Default::default(),
    );
    walk_to_documents(&mut wizard);
    attach_documents(&mut wizard, None);

    let err = wizard.submit().expect_err("record store offline");
    assert!(matches!(err, SubmitError::Failed(CommitError::Record(_))));
    assert_eq!(storage.attempts(), 6);
    assert!(drafts.read(DRAFT_KEY).expect("read").is_some());
}

#[test]
fn business_submission_persists_only_business_income() {
    let harness = harness(Some("uid-7"), MemoryStorage::default());
    let mut wizard = mount(&harness, LoanType::FlatBuying);
    fill_personal(&mut wizard);
    fill_contact(&mut wizard);
    fill_salaried_income(&mut wizard);
    wizard.apply(FieldEdit::Occupation(Occupation::Business));
    wizard.apply(FieldEdit::BusinessName("Sharma Traders".to_string()));
    wizard.apply(FieldEdit::NatureOfBusiness("Wholesale".to_string()));
    wizard.apply(FieldEdit::AnnualTurnover("12000000".to_string()));
    wizard.apply(FieldEdit::YearsInBusiness("6".to_string()));
    fill_loan(&mut wizard);
    wizard.apply(FieldEdit::DeveloperName("Other".to_string()));
    wizard.apply(FieldEdit::OtherDeveloperName("Skyline Builders".to_string()));
    wizard.apply(FieldEdit::SocietyName("Green Meadows".to_string()));
    attach_documents(&mut wizard, None);

    wizard.submit().expect("submitted");

    let (_, _, record) = &harness.records.records()[0];
    assert_eq!(
        record.income,
        IncomeDetails::Business {
            business_name: "Sharma Traders".to_string(),
            nature_of_business: "Wholesale".to_string(),
            annual_turnover: "12000000".to_string(),
            years_in_business: "6".to_string(),
            gst_number: None,
        }
    );
    assert_eq!(
        record.loan.purpose,
        LoanPurpose::FlatBuying {
            developer_name: "Skyline Builders".to_string(),
            society_name: "Green Meadows".to_string(),
        }
    );

    let listed = harness
        .records
        .list_for_user("applications", &UserId("uid-7".to_string()))
        .expect("list");
    assert_eq!(listed.len(), 1);
    let view = listed[0].1.status_view(&listed[0].0);
    assert_eq!(view.loan_type, "Flat Buying");
    assert_eq!(view.status, "Pending");
}
