//! Year-by-year amortization table and payback derivation.

use std::fmt;

use serde::Serialize;

use super::fiscal::{FiscalDeductionPlan, schedule_deduction};

/// Inputs for one amortization table.
#[derive(Debug, Clone)]
pub struct AmortizationInputs {
    /// Total initial investment (XPF); the cumulative balance starts at its
    /// negation.
    pub investment: f64,
    /// Reference energy saving in year 1 (XPF).
    pub first_year_saving: f64,
    /// Annual tariff escalation (%/year) compounding the energy saving.
    pub escalation_pct: f64,
    /// Table length in years (system lifetime).
    pub lifetime_years: u32,
    /// Marginal tax rate (%) for the fiscal schedule.
    pub marginal_rate_pct: f64,
    /// Annual fiscal-deduction ceiling (XPF).
    pub deduction_ceiling: f64,
    /// One-off replacement cost (XPF), usually the battery.
    pub replacement_cost: f64,
    /// 1-based year the replacement lands in; 0 = never.
    pub replacement_year: u32,
}

/// One year of the amortization table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AmortizationRow {
    /// Year index, 1-based.
    pub year: u32,
    /// Escalated energy saving for this year (XPF).
    pub energy_saving: f64,
    /// Tax saving from the deduction schedule, 0 outside it (XPF).
    pub fiscal_saving: f64,
    /// Replacement cost charged this year, usually 0 (XPF).
    pub replacement_cost: f64,
    /// `energy_saving + fiscal_saving − replacement_cost` (XPF).
    pub net_benefit: f64,
    /// Running balance, starting from `−investment` before year 1 (XPF).
    pub cumulative_balance: f64,
}

/// Builds the amortization table over the system lifetime.
///
/// Year `y` earns `first_year_saving × (1 + escalation/100)^(y−1)` in energy
/// savings plus the fiscal schedule's saving for `y`, minus the replacement
/// cost if `y` is the replacement year.
///
/// Returns the rows together with the fiscal plan they embed, so callers
/// can report the schedule without recomputing it.
pub fn build_table(inputs: &AmortizationInputs) -> (Vec<AmortizationRow>, FiscalDeductionPlan) {
    let fiscal = schedule_deduction(
        inputs.investment,
        inputs.marginal_rate_pct,
        inputs.deduction_ceiling,
    );

    let escalator = 1.0 + inputs.escalation_pct / 100.0;
    let mut rows = Vec::with_capacity(inputs.lifetime_years as usize);
    let mut cumulative = -inputs.investment;

    for year in 1..=inputs.lifetime_years {
        let energy_saving = inputs.first_year_saving * escalator.powi(year as i32 - 1);
        let fiscal_saving = fiscal.saving_for_year(year as usize);
        let replacement_cost = if year == inputs.replacement_year && inputs.replacement_year > 0 {
            inputs.replacement_cost
        } else {
            0.0
        };
        let net_benefit = energy_saving + fiscal_saving - replacement_cost;
        cumulative += net_benefit;

        rows.push(AmortizationRow {
            year,
            energy_saving,
            fiscal_saving,
            replacement_cost,
            net_benefit,
            cumulative_balance: cumulative,
        });
    }

    (rows, fiscal)
}

impl fmt::Display for AmortizationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year {:>2} | energy={:>10.0}  fiscal={:>9.0}  replacement={:>9.0} | \
             net={:>10.0}  cumulative={:>12.0}",
            self.year,
            self.energy_saving,
            self.fiscal_saving,
            self.replacement_cost,
            self.net_benefit,
            self.cumulative_balance,
        )
    }
}

/// First year whose cumulative balance is non-negative, if any.
pub fn payback_year(rows: &[AmortizationRow]) -> Option<u32> {
    rows.iter()
        .find(|r| r.cumulative_balance >= 0.0)
        .map(|r| r.year)
}
