//! API response and query types.
//!
//! Field names follow the CSV export headers for consistency across
//! output formats.

use serde::{Deserialize, Serialize};

use crate::calculator::EnergyBalance;
use crate::engine::series::{MONTH_LABELS, MONTHS_PER_YEAR};

/// One month of energy flows using the CSV column names.
#[derive(Debug, Serialize)]
pub struct MonthlyFlowRecord {
    /// Short month label.
    pub month: &'static str,
    /// PV production (kWh).
    pub production_kwh: f64,
    /// Self-consumed energy (kWh).
    pub self_consumption_kwh: f64,
    /// Exported surplus (kWh).
    pub surplus_kwh: f64,
    /// Grid purchase (kWh).
    pub purchase_kwh: f64,
    /// Consumption (kWh).
    pub consumption_kwh: f64,
}

/// Maps an energy balance to its twelve per-month records.
pub fn flow_records(balance: &EnergyBalance) -> Vec<MonthlyFlowRecord> {
    (0..MONTHS_PER_YEAR)
        .map(|m| MonthlyFlowRecord {
            month: MONTH_LABELS[m],
            production_kwh: balance.production[m],
            self_consumption_kwh: balance.flows.self_consumption[m],
            surplus_kwh: balance.flows.surplus[m],
            purchase_kwh: balance.flows.purchase[m],
            consumption_kwh: balance.consumption[m],
        })
        .collect()
}

/// Optional year-range query parameters for the amortization endpoint.
#[derive(Debug, Deserialize)]
pub struct AmortizationQuery {
    /// Start year, 1-based (inclusive).
    pub from: Option<u32>,
    /// End year, 1-based (inclusive).
    pub to: Option<u32>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Calculator, ResidentialRequest};
    use crate::catalog;
    use crate::config::TariffConfig;

    #[test]
    fn flow_records_cover_twelve_months() {
        let mut calc = Calculator::new(TariffConfig::default());
        let report = calc.evaluate_residential(&ResidentialRequest {
            capacity_kwc: 3.0,
            panel_watt: 400.0,
            annual_consumption_kwh: 4500.0,
            pool: false,
            profile: *catalog::occupancy_profile("active").expect("profile"),
            battery: None,
            marginal_rate_pct: 30.0,
            high_tier: false,
        });
        let records = flow_records(&report.balance);
        assert_eq!(records.len(), 12);
        assert_eq!(records[0].month, "Jan");
        assert_eq!(records[11].month, "Dec");
        // Per-month balance carried through the mapping
        for r in &records {
            assert!(
                (r.self_consumption_kwh + r.surplus_kwh - r.production_kwh).abs() < 1e-9
            );
        }
    }
}
