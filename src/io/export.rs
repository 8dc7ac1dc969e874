//! CSV export of the yearly cash flow and the monthly generation profile.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::generation::DAYS_IN_MONTH;
use crate::sim::types::{SimulationResult, YearlyPrediction};

/// Column header of the yearly cash-flow export.
const YEARLY_HEADER: &str = "year,efficiency_pct,generation_kwh,gross_revenue,maintenance_cost,\
                             loan_payment,interest,principal,remaining_principal,depreciation,\
                             taxable_income,corporate_tax,net_revenue,cumulative_cash_flow";

/// Column header of the monthly generation export.
const MONTHLY_HEADER: &str = "month,days,generation_kwh,avg_insolation_h";

/// Exports the yearly cash flow to a CSV file at the given path.
///
/// # Arguments
///
/// * `yearly` - Yearly predictions in year order
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_cashflow_csv(yearly: &[YearlyPrediction], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_cashflow_csv(yearly, buf)
}

/// Writes the yearly cash flow as CSV to any writer.
///
/// Energy is written with one decimal, money rounded to whole units.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_cashflow_csv(yearly: &[YearlyPrediction], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(YEARLY_HEADER.split(',').map(str::trim))?;

    for y in yearly {
        wtr.write_record(&[
            y.year.to_string(),
            format!("{:.2}", y.efficiency_rate),
            format!("{:.1}", y.annual_generation),
            format!("{:.0}", y.gross_revenue),
            format!("{:.0}", y.maintenance_cost),
            format!("{:.0}", y.loan_payment),
            format!("{:.0}", y.interest_payment),
            format!("{:.0}", y.principal_payment),
            format!("{:.0}", y.remaining_principal),
            format!("{:.0}", y.depreciation),
            format!("{:.0}", y.taxable_income),
            format!("{:.0}", y.corporate_tax),
            format!("{:.0}", y.net_revenue),
            format!("{:.0}", y.cumulative_cash_flow),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the year-one monthly generation profile to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_monthly_csv(result: &SimulationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_monthly_csv(result, io::BufWriter::new(file))
}

/// Writes the year-one monthly generation profile as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_monthly_csv(result: &SimulationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(MONTHLY_HEADER.split(','))?;

    for (m, days) in DAYS_IN_MONTH.iter().enumerate() {
        wtr.write_record(&[
            (m + 1).to_string(),
            days.to_string(),
            format!("{:.1}", result.monthly_generation[m]),
            format!("{:.2}", result.monthly_avg_insolation[m]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
