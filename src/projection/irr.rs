//! Internal rate of return over a projected holding period

use super::series::ProjectionSeries;
use crate::error::Result;
use crate::metrics::{compute_profitability_metrics, estimate_disposition_at};
use crate::snapshot::PropertySnapshot;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const MIN_PERIODIC_RATE: f64 = -0.99;
const MAX_PERIODIC_RATE: f64 = 10.0;

/// Annual IRR, as a decimal, of periodic cash flows (positive = inflow)
///
/// Newton-Raphson on the periodic rate, falling back to bisection when the
/// derivative vanishes or the iteration does not converge. `None` when the
/// flows never change sign or no root is bracketed.
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }
    if cashflows.iter().all(|cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    let has_inflow = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    let annualize = |periodic: f64| (1.0 + periodic).powi(periods_per_year as i32) - 1.0;

    let mut rate = 0.05 / periods_per_year as f64;
    for _ in 0..MAX_ITERATIONS {
        let (npv, slope) = npv_and_slope(cashflows, rate);
        if slope.abs() < 1e-20 {
            break;
        }

        let next = (rate - npv / slope).clamp(MIN_PERIODIC_RATE, MAX_PERIODIC_RATE);
        if (next - rate).abs() < TOLERANCE {
            return Some(annualize(next));
        }
        rate = next;
    }

    bisect(cashflows).map(annualize)
}

fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn npv_and_slope(cashflows: &[f64], rate: f64) -> (f64, f64) {
    cashflows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(npv, slope), (t, &cf)| {
            let t = t as i32;
            (
                npv + cf / (1.0 + rate).powi(t),
                slope - t as f64 * cf / (1.0 + rate).powi(t + 1),
            )
        })
}

fn bisect(cashflows: &[f64]) -> Option<f64> {
    let mut low = MIN_PERIODIC_RATE;
    let mut high = MAX_PERIODIC_RATE;
    let mut npv_low = npv(cashflows, low);
    if npv_low * npv(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);
        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }
        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// Cash flows of buying in today and selling at the end of the series
///
/// Period 0 is the cash invested (down payment plus improvements). Each
/// period then earns NOI less what was actually paid to the lender, so the
/// flows improve once the loan is retired. The last period also receives
/// the net sale proceeds.
pub fn hold_period_cashflows(
    snapshot: &PropertySnapshot,
    series: &ProjectionSeries,
) -> Result<Vec<f64>> {
    let metrics = compute_profitability_metrics(snapshot)?;
    let noi_per_period = metrics.net_operating_income / series.period_unit().periods_per_year() as f64;

    let mut cashflows = Vec::with_capacity(series.len() + 1);
    cashflows.push(-snapshot.total_cash_invested());

    let mut last_point = None;
    for point in series {
        cashflows.push(noi_per_period - point.debt_service());
        last_point = Some(point);
    }

    if let (Some(point), Some(last)) = (last_point, cashflows.last_mut()) {
        *last += estimate_disposition_at(snapshot, &point)?.net_proceeds;
    }

    Ok(cashflows)
}

/// Annualized IRR (percent) of holding the property through the series
pub fn hold_period_irr(snapshot: &PropertySnapshot, series: &ProjectionSeries) -> Result<Option<f64>> {
    let cashflows = hold_period_cashflows(snapshot, series)?;
    let periods_per_year = series.period_unit().periods_per_year();
    Ok(calculate_irr(&cashflows, periods_per_year).map(|irr| irr * 100.0))
}
