//! Sale (disposition) estimate: what the owner walks away with

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::projection::ProjectionPoint;
use crate::snapshot::PropertySnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispositionEstimate {
    pub sale_price: f64,
    pub selling_costs: f64,
    pub loan_payoff: f64,
    /// Purchase price plus improvements
    pub cost_basis: f64,
    pub taxable_gain: f64,
    pub capital_gains_tax: f64,
    /// May be negative when the sale does not cover the loan
    pub net_proceeds: f64,
}

/// Estimate a sale at today's market value
pub fn estimate_disposition(snapshot: &PropertySnapshot) -> Result<DispositionEstimate> {
    snapshot.validate()?;
    Ok(dispose(
        snapshot,
        snapshot.market_value,
        snapshot.current_loan_balance,
    ))
}

/// Estimate a sale at a projected value and balance
pub fn estimate_disposition_at(
    snapshot: &PropertySnapshot,
    point: &ProjectionPoint,
) -> Result<DispositionEstimate> {
    snapshot.validate()?;
    Ok(dispose(
        snapshot,
        point.projected_value,
        point.projected_loan_balance,
    ))
}

fn dispose(snapshot: &PropertySnapshot, sale_price: f64, loan_payoff: f64) -> DispositionEstimate {
    let selling_costs = sale_price * snapshot.selling_cost_pct / 100.0;
    let cost_basis = snapshot.purchase_price + snapshot.improvement_costs;
    let taxable_gain = (sale_price - selling_costs - cost_basis).max(0.0);
    let capital_gains_tax = taxable_gain * snapshot.capital_gains_tax_pct / 100.0;

    DispositionEstimate {
        sale_price,
        selling_costs,
        loan_payoff,
        cost_basis,
        taxable_gain,
        capital_gains_tax,
        net_proceeds: sale_price - selling_costs - loan_payoff - capital_gains_tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snapshot() -> PropertySnapshot {
        let mut s = PropertySnapshot::with_standard_financing(
            500_000.0, 400_000.0, 80_000.0, 280_000.0, 2_000.0, 6.0, 5.0,
        );
        s.improvement_costs = 25_000.0;
        s.selling_cost_pct = 6.0;
        s.capital_gains_tax_pct = 15.0;
        s
    }

    #[test]
    fn test_sale_at_market_value() {
        let d = estimate_disposition(&snapshot()).unwrap();

        assert_relative_eq!(d.selling_costs, 30_000.0, epsilon = 1e-6);
        assert_relative_eq!(d.cost_basis, 425_000.0);
        // 500000 - 30000 - 425000
        assert_relative_eq!(d.taxable_gain, 45_000.0, epsilon = 1e-6);
        assert_relative_eq!(d.capital_gains_tax, 6_750.0, epsilon = 1e-6);
        assert_relative_eq!(d.net_proceeds, 500_000.0 - 30_000.0 - 280_000.0 - 6_750.0, epsilon = 1e-6);
    }

    #[test]
    fn test_loss_is_not_taxed() {
        let mut s = snapshot();
        s.market_value = 300_000.0;
        let d = estimate_disposition(&s).unwrap();

        assert_eq!(d.taxable_gain, 0.0);
        assert_eq!(d.capital_gains_tax, 0.0);
        assert!(d.net_proceeds < 20_000.0);
    }

    #[test]
    fn test_sale_at_projected_point() {
        let point = ProjectionPoint {
            period_index: 10,
            projected_value: 600_000.0,
            projected_loan_balance: 200_000.0,
            projected_equity: 400_000.0,
            loan_to_value: 200_000.0 / 600_000.0 * 100.0,
            interest_accrued: 0.0,
            principal_paid: 0.0,
            non_amortizing: false,
        };
        let d = estimate_disposition_at(&snapshot(), &point).unwrap();
        assert_eq!(d.sale_price, 600_000.0);
        assert_eq!(d.loan_payoff, 200_000.0);
    }
}
