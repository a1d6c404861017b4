//! Load property snapshots from CSV or JSON
//!
//! This is the only place raw user data is coerced. An empty cell in an
//! optional column becomes 0; any other cell must parse or the row is
//! rejected. Rejected rows are reported alongside the loaded ones so a batch
//! can still score everything else.

use super::PropertySnapshot;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use csv::Reader;
use log::{debug, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

const DAYS_PER_YEAR: f64 = 365.25;

/// Raw CSV row; cells stay text until the row number is known
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PropertyId", default)]
    property_id: Option<String>,
    #[serde(rename = "MarketValue", default)]
    market_value: Option<String>,
    #[serde(rename = "PurchasePrice", default)]
    purchase_price: Option<String>,
    #[serde(rename = "DownPayment", default)]
    down_payment: Option<String>,
    #[serde(rename = "OriginalLoanAmount", default)]
    original_loan_amount: Option<String>,
    #[serde(rename = "CurrentLoanBalance", default)]
    current_loan_balance: Option<String>,
    #[serde(rename = "MonthlyPayment", default)]
    monthly_payment: Option<String>,
    #[serde(rename = "AnnualInterestRatePct", default)]
    annual_interest_rate_pct: Option<String>,
    #[serde(rename = "MonthlyRent", default)]
    monthly_rent: Option<String>,
    #[serde(rename = "MonthlyOperatingExpenses", default)]
    monthly_operating_expenses: Option<String>,
    #[serde(rename = "VacancyRatePct", default)]
    vacancy_rate_pct: Option<String>,
    #[serde(rename = "ImprovementCosts", default)]
    improvement_costs: Option<String>,
    #[serde(rename = "YearsOwned", default)]
    years_owned: Option<String>,
    #[serde(rename = "PurchaseDate", default)]
    purchase_date: Option<String>,
    #[serde(rename = "AsOfDate", default)]
    as_of_date: Option<String>,
    #[serde(rename = "SellingCostPct", default)]
    selling_cost_pct: Option<String>,
    #[serde(rename = "CapitalGainsTaxPct", default)]
    capital_gains_tax_pct: Option<String>,
}

/// A snapshot tagged with the identifier it was loaded under
#[derive(Debug, Clone)]
pub struct LoadedProperty {
    pub property_id: String,
    pub snapshot: PropertySnapshot,
}

/// A CSV row that could not be turned into a snapshot
#[derive(Debug)]
pub struct RejectedRow {
    /// 1-indexed data row (the header is not counted)
    pub row: usize,
    pub property_id: String,
    pub error: Error,
}

/// Everything read from one CSV source, in file order
#[derive(Debug, Default)]
pub struct LoadedPortfolio {
    pub properties: Vec<LoadedProperty>,
    pub rejected: Vec<RejectedRow>,
}

/// Parse one cell; `None` when the column is absent or the cell is blank
fn parse_cell<T: FromStr>(row: usize, column: &str, cell: Option<&str>) -> Result<Option<T>> {
    match cell.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(|_| Error::Load {
            row,
            reason: format!("{} is not a valid value: {:?}", column, text),
        }),
    }
}

fn default_property_id(row: usize) -> String {
    format!("row-{}", row)
}

impl CsvRow {
    fn property_id(&self, row: usize) -> String {
        self.property_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_property_id(row))
    }

    fn to_snapshot(&self, row: usize) -> Result<PropertySnapshot> {
        let number = |column: &str, cell: &Option<String>| -> Result<Option<f64>> {
            parse_cell(row, column, cell.as_deref())
        };
        let required = |column: &str, cell: &Option<String>| -> Result<f64> {
            number(column, cell)?.ok_or_else(|| Error::Load {
                row,
                reason: format!("missing {}", column),
            })
        };
        let optional = |column: &str, cell: &Option<String>| -> Result<f64> {
            Ok(number(column, cell)?.unwrap_or_else(|| {
                warn!("row {}: {} empty, using 0", row, column);
                0.0
            }))
        };

        let market_value = required("MarketValue", &self.market_value)?;
        let purchase_price = required("PurchasePrice", &self.purchase_price)?;
        let down_payment = required("DownPayment", &self.down_payment)?;
        let current_loan_balance = required("CurrentLoanBalance", &self.current_loan_balance)?;
        let monthly_payment = required("MonthlyPayment", &self.monthly_payment)?;
        let annual_interest_rate_pct =
            required("AnnualInterestRatePct", &self.annual_interest_rate_pct)?;

        let original_loan_amount = number("OriginalLoanAmount", &self.original_loan_amount)?
            .unwrap_or(purchase_price - down_payment);

        let purchase_date: Option<NaiveDate> =
            parse_cell(row, "PurchaseDate", self.purchase_date.as_deref())?;
        let as_of_date: Option<NaiveDate> =
            parse_cell(row, "AsOfDate", self.as_of_date.as_deref())?;
        let years_owned = match (number("YearsOwned", &self.years_owned)?, purchase_date, as_of_date) {
            (Some(years), _, _) => years,
            (None, Some(purchased), Some(as_of)) => years_between(purchased, as_of),
            _ => {
                return Err(Error::Load {
                    row,
                    reason: "YearsOwned missing and no PurchaseDate/AsOfDate pair".to_string(),
                })
            }
        };

        Ok(PropertySnapshot {
            market_value,
            purchase_price,
            down_payment,
            original_loan_amount,
            current_loan_balance,
            monthly_payment,
            annual_interest_rate_pct,
            monthly_rent: optional("MonthlyRent", &self.monthly_rent)?,
            monthly_operating_expenses: optional(
                "MonthlyOperatingExpenses",
                &self.monthly_operating_expenses,
            )?,
            vacancy_rate_pct: optional("VacancyRatePct", &self.vacancy_rate_pct)?,
            improvement_costs: optional("ImprovementCosts", &self.improvement_costs)?,
            years_owned,
            selling_cost_pct: optional("SellingCostPct", &self.selling_cost_pct)?,
            capital_gains_tax_pct: optional("CapitalGainsTaxPct", &self.capital_gains_tax_pct)?,
        })
    }
}

/// Fractional years between two dates; negative spans are returned as-is
/// so that validation rejects them
pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

/// Load all properties from a CSV file
pub fn load_properties<P: AsRef<Path>>(path: P) -> Result<LoadedPortfolio> {
    let file = File::open(path.as_ref())?;
    let portfolio = load_properties_from_reader(file)?;
    debug!(
        "loaded {} properties ({} rejected) from {}",
        portfolio.properties.len(),
        portfolio.rejected.len(),
        path.as_ref().display()
    );
    Ok(portfolio)
}

/// Load properties from any reader (e.g., string buffer, stdin)
///
/// Bad rows are logged and collected in [`LoadedPortfolio::rejected`]; only
/// an I/O failure aborts the load.
pub fn load_properties_from_reader<R: std::io::Read>(reader: R) -> Result<LoadedPortfolio> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut portfolio = LoadedPortfolio::default();

    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        // Data rows are 1-indexed after the header
        let row_number = index + 1;
        let (property_id, outcome) = match result {
            Ok(record) => (record.property_id(row_number), record.to_snapshot(row_number)),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => (default_property_id(row_number), Err(e.into())),
        };

        match outcome {
            Ok(snapshot) => portfolio.properties.push(LoadedProperty {
                property_id,
                snapshot,
            }),
            Err(error) => {
                warn!("rejecting CSV row {} ({}): {}", row_number, property_id, error);
                portfolio.rejected.push(RejectedRow {
                    row: row_number,
                    property_id,
                    error,
                });
            }
        }
    }

    Ok(portfolio)
}

/// Load a single snapshot from a JSON file with snake_case keys
pub fn load_snapshot_json<P: AsRef<Path>>(path: P) -> Result<PropertySnapshot> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
