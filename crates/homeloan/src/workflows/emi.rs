//! Reducing-balance EMI calculator.
//!
//! `EMI = P·R·(1+R)^N / ((1+R)^N − 1)` with `R` the monthly rate and `N` the number of
//! monthly installments. Totals are derived from the unrounded installment and each figure
//! is rounded to the nearest currency unit only when reported.

use std::io;

use serde::{Deserialize, Serialize};

const MAX_TENURE_YEARS: u32 = 40;
const MAX_ANNUAL_RATE_PERCENT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmiRequest {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub tenure_years: u32,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EmiError {
    #[error("principal must be a positive amount (found {0})")]
    InvalidPrincipal(f64),
    #[error("annual rate must be between 0 and 50% (found {0})")]
    InvalidRate(f64),
    #[error("tenure must be between 1 and 40 years (found {0})")]
    InvalidTenure(u32),
}

/// Rounded installment summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiBreakdown {
    pub monthly_emi: u64,
    pub total_interest: u64,
    pub total_payment: u64,
}

/// One year of the amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub principal_paid: u64,
    pub interest_paid: u64,
    pub closing_balance: u64,
}

/// Validated calculator for a single loan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmiCalculator {
    principal: f64,
    monthly_rate: f64,
    months: u32,
}

impl EmiCalculator {
    pub fn new(request: EmiRequest) -> Result<Self, EmiError> {
        let EmiRequest {
            principal,
            annual_rate_percent,
            tenure_years,
        } = request;

        if !principal.is_finite() || principal <= 0.0 {
            return Err(EmiError::InvalidPrincipal(principal));
        }
        if !annual_rate_percent.is_finite()
            || !(0.0..=MAX_ANNUAL_RATE_PERCENT).contains(&annual_rate_percent)
        {
            return Err(EmiError::InvalidRate(annual_rate_percent));
        }
        if tenure_years == 0 || tenure_years > MAX_TENURE_YEARS {
            return Err(EmiError::InvalidTenure(tenure_years));
        }

        Ok(Self {
            principal,
            monthly_rate: annual_rate_percent / 12.0 / 100.0,
            months: tenure_years * 12,
        })
    }

    /// Unrounded monthly installment.
    pub fn monthly_installment(&self) -> f64 {
        let n = f64::from(self.months);
        if self.monthly_rate == 0.0 {
            return self.principal / n;
        }
        let growth = (1.0 + self.monthly_rate).powf(n);
        self.principal * self.monthly_rate * growth / (growth - 1.0)
    }

    pub fn breakdown(&self) -> EmiBreakdown {
        let emi = self.monthly_installment();
        let total_payment = emi * f64::from(self.months);
        EmiBreakdown {
            monthly_emi: round_currency(emi),
            total_interest: round_currency(total_payment - self.principal),
            total_payment: round_currency(total_payment),
        }
    }

    /// Yearly totals of the month-by-month reducing balance.
    pub fn amortization_schedule(&self) -> Vec<AmortizationYear> {
        let emi = self.monthly_installment();
        let mut balance = self.principal;
        let mut schedule = Vec::with_capacity((self.months / 12) as usize);
        let mut principal_paid = 0.0;
        let mut interest_paid = 0.0;

        for month in 1..=self.months {
            let interest = balance * self.monthly_rate;
            let principal = (emi - interest).min(balance);
            balance -= principal;
            principal_paid += principal;
            interest_paid += interest;

            if month % 12 == 0 || month == self.months {
                schedule.push(AmortizationYear {
                    year: month.div_ceil(12),
                    principal_paid: round_currency(principal_paid),
                    interest_paid: round_currency(interest_paid),
                    closing_balance: round_currency(balance.max(0.0)),
                });
                principal_paid = 0.0;
                interest_paid = 0.0;
            }
        }

        schedule
    }
}

/// Convenience wrapper for one-off calculations.
pub fn calculate_emi(request: EmiRequest) -> Result<EmiBreakdown, EmiError> {
    EmiCalculator::new(request).map(|calculator| calculator.breakdown())
}

/// Write the schedule as CSV with a header row.
pub fn write_schedule_csv<W: io::Write>(
    schedule: &[AmortizationYear],
    writer: W,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for year in schedule {
        writer.serialize(year)?;
    }
    writer.flush()?;
    Ok(())
}

fn round_currency(value: f64) -> u64 {
    if value <= 0.0 {
        0
    } else {
        value.round() as u64
    }
}
