//! Month-by-month state of a property during projection

use crate::snapshot::PropertySnapshot;

/// Inputs that stay fixed for the whole projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    /// Monthly value growth as a decimal
    pub monthly_growth: f64,
    /// Monthly interest rate as a decimal
    pub monthly_rate: f64,
    /// Scheduled payment per month
    pub payment: f64,
}

/// Outcome of advancing one month
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthStep {
    pub interest: f64,
    /// Negative when the balance grew
    pub principal: f64,
    pub non_amortizing: bool,
}

/// Value and balance at a point in the projection
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionState {
    /// Months elapsed since the snapshot
    pub month: u32,
    pub value: f64,
    pub balance: f64,
}

impl ProjectionState {
    /// State at month 0, straight from the snapshot
    pub fn from_snapshot(snapshot: &PropertySnapshot) -> Self {
        Self {
            month: 0,
            value: snapshot.market_value,
            balance: snapshot.current_loan_balance,
        }
    }

    /// Advance one month: compound the value and run the amortization
    /// recurrence on the current balance
    pub fn advance_month(&mut self, params: &StepParams) -> MonthStep {
        self.month += 1;
        self.value *= 1.0 + params.monthly_growth;

        if self.balance <= 0.0 {
            // Fully amortized; balance stays locked at 0
            self.balance = 0.0;
            return MonthStep::default();
        }

        let interest = self.balance * params.monthly_rate;
        if params.payment > interest {
            let principal = (params.payment - interest).min(self.balance);
            self.balance -= principal;
            MonthStep {
                interest,
                principal,
                non_amortizing: false,
            }
        } else {
            // Negative amortization: unpaid interest is added to the balance
            let principal = params.payment - interest;
            self.balance -= principal;
            MonthStep {
                interest,
                principal,
                non_amortizing: true,
            }
        }
    }

    pub fn equity(&self) -> f64 {
        self.value - self.balance
    }
}

/// Level monthly payment that retires `principal` in `months` at the given
/// annual rate (percent)
pub fn level_payment(principal: f64, annual_rate_pct: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }
    let rate = annual_rate_pct / 100.0 / 12.0;
    if rate == 0.0 {
        return principal / months as f64;
    }
    let factor = (1.0 + rate).powi(months as i32);
    principal * rate * factor / (factor - 1.0)
}
