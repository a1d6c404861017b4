//! Property snapshot: the flat input record every calculation starts from

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Financial state of one property at a point in time
///
/// Money fields share a single currency unit. Percentages are on a 0-100
/// scale (5.0 means 5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    /// Current estimated value
    pub market_value: f64,

    /// Original acquisition cost
    pub purchase_price: f64,

    /// Cash contributed at purchase
    pub down_payment: f64,

    /// Amount borrowed at purchase (or refinanced amount)
    pub original_loan_amount: f64,

    /// Outstanding principal today
    pub current_loan_balance: f64,

    /// Scheduled principal + interest payment
    pub monthly_payment: f64,

    /// Nominal annual interest rate, percent
    pub annual_interest_rate_pct: f64,

    /// Scheduled rent at full occupancy
    pub monthly_rent: f64,

    /// Operating expenses excluding debt service
    pub monthly_operating_expenses: f64,

    /// Expected vacancy and credit loss, percent of gross rent
    pub vacancy_rate_pct: f64,

    /// Capital added since purchase
    pub improvement_costs: f64,

    /// Holding period so far, in years
    pub years_owned: f64,

    /// Transaction costs on sale, percent of sale price
    pub selling_cost_pct: f64,

    /// Tax on realized gain, percent
    pub capital_gains_tax_pct: f64,
}

impl PropertySnapshot {
    /// Snapshot with the loan derived as purchase price less down payment
    ///
    /// Income, expense and disposition fields start at zero.
    pub fn with_standard_financing(
        market_value: f64,
        purchase_price: f64,
        down_payment: f64,
        current_loan_balance: f64,
        monthly_payment: f64,
        annual_interest_rate_pct: f64,
        years_owned: f64,
    ) -> Self {
        Self {
            market_value,
            purchase_price,
            down_payment,
            original_loan_amount: purchase_price - down_payment,
            current_loan_balance,
            monthly_payment,
            annual_interest_rate_pct,
            monthly_rent: 0.0,
            monthly_operating_expenses: 0.0,
            vacancy_rate_pct: 0.0,
            improvement_costs: 0.0,
            years_owned,
            selling_cost_pct: 0.0,
            capital_gains_tax_pct: 0.0,
        }
    }

    /// Check every field and cross-field invariant
    ///
    /// Nothing is clamped or repaired: the first violation is reported.
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("market_value", self.market_value),
            ("purchase_price", self.purchase_price),
            ("down_payment", self.down_payment),
            ("original_loan_amount", self.original_loan_amount),
            ("current_loan_balance", self.current_loan_balance),
            ("monthly_payment", self.monthly_payment),
            ("monthly_rent", self.monthly_rent),
            ("monthly_operating_expenses", self.monthly_operating_expenses),
            ("improvement_costs", self.improvement_costs),
            ("years_owned", self.years_owned),
        ];
        for (field, value) in amounts {
            non_negative(field, value)?;
        }

        let percents = [
            ("annual_interest_rate_pct", self.annual_interest_rate_pct),
            ("vacancy_rate_pct", self.vacancy_rate_pct),
            ("selling_cost_pct", self.selling_cost_pct),
            ("capital_gains_tax_pct", self.capital_gains_tax_pct),
        ];
        for (field, value) in percents {
            percent(field, value)?;
        }

        if self.down_payment > self.purchase_price {
            return Err(Error::invalid(
                "down_payment",
                format!(
                    "{} exceeds purchase price {}",
                    self.down_payment, self.purchase_price
                ),
            ));
        }

        if self.current_loan_balance > self.original_loan_amount {
            return Err(Error::invalid(
                "current_loan_balance",
                format!(
                    "{} exceeds original loan amount {}",
                    self.current_loan_balance, self.original_loan_amount
                ),
            ));
        }

        Ok(())
    }

    /// Purchase price not covered by down payment plus original loan
    ///
    /// Zero under standard financing, negative when the loan was larger.
    pub fn financing_gap(&self) -> f64 {
        self.purchase_price - self.down_payment - self.original_loan_amount
    }

    /// Cash put into the property: down payment plus improvements
    pub fn total_cash_invested(&self) -> f64 {
        self.down_payment + self.improvement_costs
    }

    /// Monthly interest rate as a decimal
    pub fn monthly_interest_rate(&self) -> f64 {
        self.annual_interest_rate_pct / 100.0 / 12.0
    }

    /// Loan balance as a percent of market value, 0 when the value is 0
    pub fn loan_to_value(&self) -> f64 {
        loan_to_value(self.current_loan_balance, self.market_value)
    }
}

/// Loan-to-value percentage with a defined result for a zero-value property
pub fn loan_to_value(balance: f64, value: f64) -> f64 {
    if value > 0.0 {
        balance / value * 100.0
    } else {
        0.0
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid(field, format!("{} is not a finite number", value)));
    }
    if value < 0.0 {
        return Err(Error::invalid(field, format!("{} is negative", value)));
    }
    Ok(())
}

fn percent(field: &'static str, value: f64) -> Result<()> {
    non_negative(field, value)?;
    if value > 100.0 {
        return Err(Error::invalid(field, format!("{} is above 100%", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PropertySnapshot {
        PropertySnapshot::with_standard_financing(
            500_000.0, // market value
            400_000.0, // purchase price
            80_000.0,  // down payment
            280_000.0, // current balance
            2_000.0,   // monthly payment
            6.0,       // rate
            5.0,       // years owned
        )
    }

    #[test]
    fn test_standard_financing_derives_loan() {
        let s = snapshot();
        assert_eq!(s.original_loan_amount, 320_000.0);
        assert_eq!(s.financing_gap(), 0.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_negative_money_rejected() {
        let mut s = snapshot();
        s.monthly_rent = -1.0;
        match s.validate() {
            Err(Error::InvalidInput { field, .. }) => assert_eq!(field, "monthly_rent"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut s = snapshot();
        s.market_value = f64::NAN;
        assert!(matches!(
            s.validate(),
            Err(Error::InvalidInput { field: "market_value", .. })
        ));
    }

    #[test]
    fn test_down_payment_above_price_rejected() {
        let mut s = snapshot();
        s.down_payment = 450_000.0;
        assert!(matches!(
            s.validate(),
            Err(Error::InvalidInput { field: "down_payment", .. })
        ));
    }

    #[test]
    fn test_balance_above_original_loan_rejected() {
        let mut s = snapshot();
        s.current_loan_balance = 330_000.0;
        assert!(matches!(
            s.validate(),
            Err(Error::InvalidInput { field: "current_loan_balance", .. })
        ));
    }

    #[test]
    fn test_percent_above_hundred_rejected() {
        let mut s = snapshot();
        s.vacancy_rate_pct = 120.0;
        assert!(matches!(
            s.validate(),
            Err(Error::InvalidInput { field: "vacancy_rate_pct", .. })
        ));
    }

    #[test]
    fn test_loan_to_value_zero_value() {
        let mut s = snapshot();
        s.market_value = 0.0;
        let ltv = s.loan_to_value();
        assert_eq!(ltv, 0.0);
        assert!(ltv.is_finite());
    }
}
