//! Equity decomposition
//!
//! Accounting convention: improvements are treated as a subset of the market
//! gain, never added on top of it. An improvement only counts as equity to
//! the extent the property actually gained value; the rest of the gain is
//! attributed to appreciation. A market loss contributes nothing to the
//! appreciation bucket and is reported separately as `unrealized_loss`, so
//!
//! ```text
//! down_payment + appreciation + improvements + principal_paydown
//!     + financing_gap - unrealized_loss == total_equity
//! ```
//!
//! holds for every valid snapshot.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::snapshot::PropertySnapshot;

/// Where the owner's equity came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityDecomposition {
    /// Market value less current loan balance; negative when underwater
    pub total_equity: f64,
    pub from_down_payment: f64,
    /// Market gain not explained by improvements
    pub from_appreciation: f64,
    pub from_principal_paydown: f64,
    /// Improvement spend, capped at the market gain
    pub from_improvements: f64,
    /// Purchase price not covered by down payment + original loan
    pub from_financing_gap: f64,
    /// Shortfall of market value below purchase price
    pub unrealized_loss: f64,
}

impl EquityDecomposition {
    /// Sum of the components, before subtracting any unrealized loss
    pub fn component_sum(&self) -> f64 {
        self.from_down_payment
            + self.from_appreciation
            + self.from_principal_paydown
            + self.from_improvements
            + self.from_financing_gap
    }
}

/// Split the snapshot's equity into its sources
pub fn compute_equity_decomposition(snapshot: &PropertySnapshot) -> Result<EquityDecomposition> {
    snapshot.validate()?;

    let market_gain = snapshot.market_value - snapshot.purchase_price;
    let positive_gain = market_gain.max(0.0);
    let from_improvements = snapshot.improvement_costs.min(positive_gain);

    Ok(EquityDecomposition {
        total_equity: snapshot.market_value - snapshot.current_loan_balance,
        from_down_payment: snapshot.down_payment,
        from_appreciation: positive_gain - from_improvements,
        from_principal_paydown: snapshot.original_loan_amount - snapshot.current_loan_balance,
        from_improvements,
        from_financing_gap: snapshot.financing_gap(),
        unrealized_loss: (-market_gain).max(0.0),
    })
}
