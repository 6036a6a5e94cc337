//! CSV export for evaluation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::calculator::EnergyBalance;
use crate::engine::amortization::AmortizationRow;
use crate::engine::series::{MONTH_LABELS, MONTHS_PER_YEAR};

/// Column header for the monthly flows table.
const FLOWS_HEADER: &str = "month,production_kwh,self_consumption_kwh,surplus_kwh,\
                            purchase_kwh,consumption_kwh";

/// Column header for the amortization table.
const AMORTIZATION_HEADER: &str = "year,energy_saving,fiscal_saving,replacement_cost,\
                                   net_benefit,cumulative_balance";

/// Exports the monthly energy flows to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_flows_csv(balance: &EnergyBalance, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_flows_csv(balance, buf)
}

/// Writes the monthly energy flows as CSV to any writer.
///
/// One row per month, header first. Deterministic for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_flows_csv(balance: &EnergyBalance, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(FLOWS_HEADER.split(',').map(str::trim))?;

    for m in 0..MONTHS_PER_YEAR {
        wtr.write_record(&[
            MONTH_LABELS[m].to_string(),
            format!("{:.2}", balance.production[m]),
            format!("{:.2}", balance.flows.self_consumption[m]),
            format!("{:.2}", balance.flows.surplus[m]),
            format!("{:.2}", balance.flows.purchase[m]),
            format!("{:.2}", balance.consumption[m]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the amortization table to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_amortization_csv(rows: &[AmortizationRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_amortization_csv(rows, buf)
}

/// Writes the amortization table as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_amortization_csv(rows: &[AmortizationRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(AMORTIZATION_HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.year.to_string(),
            format!("{:.0}", r.energy_saving),
            format!("{:.0}", r.fiscal_saving),
            format!("{:.0}", r.replacement_cost),
            format!("{:.0}", r.net_benefit),
            format!("{:.0}", r.cumulative_balance),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
