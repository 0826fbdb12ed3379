use crate::infra::{
    format_timestamp, DemoLocator, DemoPicker, InMemoryDocumentStorage, InMemoryRecordStore,
    StaticIdentity, SyntheticDocumentLoader,
};
use clap::Args;
use homeloan::config::{AppConfig, WizardConfig};
use homeloan::error::AppError;
use homeloan::workflows::emi::{write_schedule_csv, EmiCalculator, EmiRequest};
use homeloan::workflows::loan_application::{
    ApplicationRecordStore, DocumentSlot, DraftStore, FieldEdit, FieldIssue, FileDraftStore,
    Gender, IssueKind, LoanApplicationWizard, LoanType, MemoryDraftStore, Occupation, PickSource,
    SessionProfile, SuggestionField, Transition, UserId, WizardContext, WizardError, WizardStep,
    DRAFT_KEY,
};
use serde_json::Value;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_RATE_PERCENT: f64 = 8.5;

#[derive(Args, Debug)]
pub(crate) struct EmiArgs {
    /// Loan principal in rupees
    #[arg(long)]
    pub(crate) principal: f64,
    /// Annual interest rate in percent
    #[arg(long)]
    pub(crate) rate: f64,
    /// Tenure in years
    #[arg(long)]
    pub(crate) years: u32,
    /// Print the year-by-year amortization schedule
    #[arg(long)]
    pub(crate) schedule: bool,
    /// Write the amortization schedule to a CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Loan type label used to seed the wizard (Construction, Renovation, Flat Buying, LAP)
    #[arg(long, value_parser = parse_loan_type, default_value = "Flat Buying")]
    pub(crate) loan_type: Option<LoanType>,
    /// Persist drafts under this directory (defaults to DRAFT_DIR)
    #[arg(long)]
    pub(crate) draft_dir: Option<PathBuf>,
    /// Keep drafts in memory for this run only
    #[arg(long, conflicts_with = "draft_dir")]
    pub(crate) in_memory_drafts: bool,
    /// Submit without a signed-in user to show the login redirect
    #[arg(long)]
    pub(crate) signed_out: bool,
    /// Simulate a storage outage on the given upload attempt (1-based)
    #[arg(long)]
    pub(crate) fail_upload: Option<usize>,
    /// Leave one document slot empty to show the missing-documents alert
    #[arg(long)]
    pub(crate) skip_property_proof: bool,
}

fn parse_loan_type(raw: &str) -> Result<LoanType, String> {
    LoanType::from_label(raw).ok_or_else(|| {
        let known: Vec<&str> = LoanType::ALL.iter().map(|loan| loan.label()).collect();
        format!("unknown loan type '{raw}' (expected one of: {})", known.join(", "))
    })
}

pub(crate) fn run_emi(args: EmiArgs) -> Result<(), AppError> {
    let calculator = EmiCalculator::new(EmiRequest {
        principal: args.principal,
        annual_rate_percent: args.rate,
        tenure_years: args.years,
    })?;
    let breakdown = calculator.breakdown();

    println!(
        "EMI for ₹{} at {:.2}% over {} years",
        group_inr(args.principal.round() as u64),
        args.rate,
        args.years
    );
    println!("- Monthly EMI:    ₹{}", group_inr(breakdown.monthly_emi));
    println!("- Total interest: ₹{}", group_inr(breakdown.total_interest));
    println!("- Total payment:  ₹{}", group_inr(breakdown.total_payment));

    if args.schedule || args.csv.is_some() {
        let schedule = calculator.amortization_schedule();
        if args.schedule {
            println!("\nYear | Principal paid | Interest paid | Closing balance");
            for year in &schedule {
                println!(
                    "{:>4} | {:>14} | {:>13} | {:>15}",
                    year.year,
                    group_inr(year.principal_paid),
                    group_inr(year.interest_paid),
                    group_inr(year.closing_balance)
                );
            }
        }
        if let Some(path) = args.csv {
            let file = File::create(&path)?;
            write_schedule_csv(&schedule, file)?;
            println!("\nSchedule written to {}", path.display());
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        loan_type,
        draft_dir,
        in_memory_drafts,
        signed_out,
        fail_upload,
        skip_property_proof,
    } = args;
    let config = AppConfig::load()?;

    let drafts: Arc<dyn DraftStore> = if in_memory_drafts {
        Arc::new(MemoryDraftStore::default())
    } else {
        let dir = resolve_draft_dir(draft_dir, &config.wizard);
        println!("Drafts persist under {}", dir.display());
        Arc::new(FileDraftStore::new(dir))
    };
    let user = (!signed_out).then(|| UserId("demo-applicant".to_string()));
    let storage = Arc::new(InMemoryDocumentStorage::failing_on(fail_upload));
    let records = Arc::new(InMemoryRecordStore::default());
    let context = WizardContext::new(
        drafts.clone(),
        Arc::new(StaticIdentity(user.clone())),
        storage.clone(),
        records.clone(),
    )
    .with_loader(Arc::new(SyntheticDocumentLoader))
    .with_policy(config.wizard.policy());
    let collection = context.policy().collection.clone();

    let session = SessionProfile {
        full_name: Some("Ananya Kulkarni".to_string()),
        phone: Some("9820012345".to_string()),
        address: None,
    };
    let loan_type = loan_type.unwrap_or(LoanType::FlatBuying);
    let (mut wizard, report) = LoanApplicationWizard::mount(context, loan_type, &session);

    println!("Home loan application demo ({})", loan_type.label());
    println!(
        "- Draft restored: {} | session overrides: {}",
        yes_no(report.restored_draft),
        report.session_overrides.len()
    );

    announce(&wizard);
    wizard.apply(FieldEdit::DateOfBirth("14071991".to_string()));
    wizard.apply(FieldEdit::Gender(Gender::Female));
    wizard.apply(FieldEdit::Pan("fghij5678l".to_string()));
    wizard.apply(FieldEdit::Aadhaar("456712349876".to_string()));
    print_issues(&wizard.step_issues(wizard.step()));
    if !step_forward(&mut wizard)? {
        return report_kept_draft(drafts.as_ref());
    }

    announce(&wizard);
    wizard.apply(FieldEdit::Email("ananya@example.in".to_string()));
    match wizard.use_current_location(&DemoLocator) {
        Ok(address) => println!("  Current address from location: {address}"),
        Err(err) => println!("  {}: {}", err.alert().title, err.alert().message),
    }
    wizard.apply(FieldEdit::SameAddress(true));
    print_issues(&wizard.step_issues(wizard.step()));
    if !step_forward(&mut wizard)? {
        return report_kept_draft(drafts.as_ref());
    }

    announce(&wizard);
    wizard.apply(FieldEdit::Occupation(Occupation::Salaried));
    wizard.apply(FieldEdit::CompanyName("tata".to_string()));
    println!(
        "  Employer suggestions for 'tata': {}",
        wizard.suggestions(SuggestionField::Employer).join(", ")
    );
    wizard.select_suggestion(SuggestionField::Employer, "Tata Consultancy Services");
    wizard.select_suggestion(SuggestionField::Industry, "Information Technology");
    wizard.apply(FieldEdit::MonthlyIncome("185000".to_string()));
    wizard.apply(FieldEdit::YearsOfExperience("9".to_string()));
    wizard.apply(FieldEdit::HasExistingLoan(false));
    print_issues(&wizard.step_issues(wizard.step()));
    if !step_forward(&mut wizard)? {
        return report_kept_draft(drafts.as_ref());
    }

    announce(&wizard);
    wizard.apply(FieldEdit::LoanAmount("6500000".to_string()));
    wizard.apply(FieldEdit::TenureYears("25".to_string()));
    wizard.apply(FieldEdit::PropertyValue("9000000".to_string()));
    if wizard.form().loan.loan_type == LoanType::FlatBuying {
        wizard.select_suggestion(SuggestionField::Developer, "Godrej Properties");
        wizard.apply(FieldEdit::SocietyName("Godrej Hillside".to_string()));
    }
    if let Ok(calculator) = EmiCalculator::new(EmiRequest {
        principal: 6_500_000.0,
        annual_rate_percent: DEMO_RATE_PERCENT,
        tenure_years: 25,
    }) {
        println!(
            "  Indicative EMI at {DEMO_RATE_PERCENT}%: ₹{}",
            group_inr(calculator.breakdown().monthly_emi)
        );
    }
    print_issues(&wizard.step_issues(wizard.step()));
    if !step_forward(&mut wizard)? {
        return report_kept_draft(drafts.as_ref());
    }

    announce(&wizard);
    for slot in DocumentSlot::ALL {
        if skip_property_proof && slot == DocumentSlot::PropertyProof {
            continue;
        }
        let source = match slot {
            DocumentSlot::IncomeProof | DocumentSlot::PropertyProof => PickSource::Pdf,
            _ => PickSource::ImageLibrary,
        };
        match wizard.attach_document(&DemoPicker, slot, source) {
            Ok(Some(document)) => println!("  Attached {}: {}", slot.label(), document.file_name()),
            Ok(None) => println!("  {} skipped", slot.label()),
            Err(err) => println!("  {}: {}", err.alert().title, err.alert().message),
        }
    }

    if !step_forward(&mut wizard)? {
        return report_kept_draft(drafts.as_ref());
    }

    println!("\nStored objects: {}", storage.object_count());
    if let Some(user) = user {
        let listed = match records.list_for_user(&collection, &user) {
            Ok(listed) => listed,
            Err(err) => {
                println!("- Unable to list submitted records: {err}");
                return Ok(());
            }
        };
        for (record_id, record) in listed {
            let view = record.status_view(&record_id);
            println!(
                "- Record {} | {} | {} | ₹{} | submitted {}",
                view.record_id.0,
                view.status,
                view.loan_type,
                view.amount,
                format_timestamp(view.submitted_at)
            );
        }
    }

    Ok(())
}

fn resolve_draft_dir(flag: Option<PathBuf>, config: &WizardConfig) -> PathBuf {
    flag.unwrap_or_else(|| config.draft_dir.clone())
}

/// Shows what a returning applicant would resume from after the walk stopped early.
fn report_kept_draft(drafts: &dyn DraftStore) -> Result<(), AppError> {
    match drafts.read(DRAFT_KEY)? {
        Some(draft) => {
            let documents = draft
                .get("documents")
                .and_then(Value::as_object)
                .map_or(0, |slots| slots.len());
            println!("  Draft kept for resume with {documents} attached document(s)");
        }
        None => println!("  No draft kept"),
    }
    Ok(())
}

fn announce(wizard: &LoanApplicationWizard) {
    let step = wizard.step();
    println!(
        "\nStep {} of {}: {}",
        step.number(),
        WizardStep::LAST.number(),
        step.title()
    );
}

/// Advances the wizard; `false` when the walk should stop after an alert.
fn step_forward(wizard: &mut LoanApplicationWizard) -> Result<bool, AppError> {
    match wizard.advance() {
        Ok(Transition::Moved { step, draft_saved }) => {
            println!(
                "  -> moved to step {} (draft saved: {})",
                step.number(),
                yes_no(draft_saved)
            );
            Ok(true)
        }
        Ok(Transition::Submitted(receipt)) => {
            let alert = receipt.alert();
            println!("  {}: {} (record {})", alert.title, alert.message, receipt.record_id.0);
            Ok(true)
        }
        Err(WizardError::Submit(err)) => {
            let alert = err.alert();
            println!(
                "  {}: {} (then {:?})",
                alert.title, alert.message, alert.on_acknowledge
            );
            Ok(false)
        }
        Err(err @ WizardError::InvalidFields(_)) => Err(AppError::Wizard(err)),
    }
}

fn print_issues(issues: &[FieldIssue]) {
    let flagged: Vec<String> = issues
        .iter()
        .map(|issue| {
            let kind = match issue.kind {
                IssueKind::Missing => "missing",
                IssueKind::InvalidFormat => "check format",
            };
            format!("{:?} ({kind})", issue.field)
        })
        .collect();
    if !flagged.is_empty() {
        println!("  Advisory: {}", flagged.join(", "));
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Indian digit grouping: `10338054` becomes `1,03,38,054`.
fn group_inr(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
