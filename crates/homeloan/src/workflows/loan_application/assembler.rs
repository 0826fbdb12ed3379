use std::collections::BTreeMap;

use super::domain::{
    ApplicationForm, ApplicationRecord, ApplicationStatus, ContactRecord, DocumentSlot,
    ExistingObligations, IncomeDetails, LoanDetails, LoanPurpose, LoanType, Occupation, UserId,
    OTHER_CHOICE,
};

/// Uploaded document URLs keyed by slot.
pub type UploadedDocuments = BTreeMap<DocumentSlot, String>;

/// Builds the persisted record from the aggregate and the staged uploads. Only the active
/// income sub-schema and loan purpose are carried over.
pub fn assemble_record(
    form: &ApplicationForm,
    docs: UploadedDocuments,
    user_id: &UserId,
) -> ApplicationRecord {
    ApplicationRecord {
        user_id: user_id.clone(),
        status: ApplicationStatus::Pending,
        personal: form.personal.clone(),
        contact: contact_record(form),
        income: income_details(form),
        obligations: obligations(form),
        loan: loan_details(form),
        docs,
        submitted_at: None,
    }
}

/// `"Other"` resolves to the override text; anything else is taken as entered.
pub fn resolve_choice(choice: &str, other: &str) -> String {
    if choice.trim() == OTHER_CHOICE {
        other.trim().to_string()
    } else {
        choice.trim().to_string()
    }
}

fn contact_record(form: &ApplicationForm) -> ContactRecord {
    let contact = &form.contact;
    let permanent_address = if contact.is_same_address {
        contact.current_address.clone()
    } else {
        contact.permanent_address.clone()
    };

    ContactRecord {
        email: contact.email.trim().to_string(),
        phone: contact.phone.clone(),
        alternate_phone: contact.alternate_phone.clone(),
        current_address: contact.current_address.clone(),
        permanent_address,
        is_same_address: contact.is_same_address,
    }
}

fn income_details(form: &ApplicationForm) -> IncomeDetails {
    let income = &form.income;
    match income.occupation {
        Occupation::Salaried => {
            let salaried = &income.salaried;
            IncomeDetails::Salaried {
                employer_name: resolve_choice(&salaried.company_name, &salaried.other_company_name),
                industry: resolve_choice(&salaried.industry, &salaried.other_industry),
                monthly_income: salaried.monthly_income.clone(),
                years_of_experience: salaried.years_of_experience.clone(),
            }
        }
        Occupation::SelfEmployed => {
            let professional = &income.self_employed;
            IncomeDetails::SelfEmployed {
                profession: professional.profession.trim().to_string(),
                monthly_income: professional.monthly_income.clone(),
                years_in_profession: professional.years_in_profession.clone(),
            }
        }
        Occupation::Business => {
            let business = &income.business;
            let gst_number = business.gst_number.trim();
            IncomeDetails::Business {
                business_name: business.business_name.trim().to_string(),
                nature_of_business: business.nature_of_business.trim().to_string(),
                annual_turnover: business.annual_turnover.clone(),
                years_in_business: business.years_in_business.clone(),
                gst_number: (!gst_number.is_empty()).then(|| gst_number.to_string()),
            }
        }
    }
}

fn obligations(form: &ApplicationForm) -> ExistingObligations {
    let obligations = &form.income.obligations;
    if !obligations.has_existing_loan {
        return ExistingObligations {
            has_existing_loan: false,
            loan_types: Default::default(),
            total_emi: None,
        };
    }

    let total_emi = obligations.total_emi.trim();
    ExistingObligations {
        has_existing_loan: true,
        loan_types: obligations.loan_types.clone(),
        total_emi: (!total_emi.is_empty()).then(|| total_emi.to_string()),
    }
}

fn loan_details(form: &ApplicationForm) -> LoanDetails {
    let loan = &form.loan;
    let purpose = match loan.loan_type {
        LoanType::Construction => LoanPurpose::Construction,
        LoanType::Renovation => LoanPurpose::Renovation,
        LoanType::FlatBuying => LoanPurpose::FlatBuying {
            developer_name: resolve_choice(&loan.developer_name, &loan.other_developer_name),
            society_name: loan.society_name.trim().to_string(),
        },
        LoanType::LoanAgainstProperty => LoanPurpose::LoanAgainstProperty,
    };

    LoanDetails {
        amount: loan.amount.clone(),
        tenure_years: loan.tenure_years.clone(),
        property_value: loan.property_value.clone(),
        purpose,
    }
}
