pub mod emi;
pub mod loan_application;
