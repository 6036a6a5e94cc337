//! Income-abatement deduction scheduling.
//!
//! The jurisdiction lets the full eligible investment be deducted from
//! taxable income, spread over successive years under an annual ceiling.
//! The realized saving each year is the deducted amount times the marginal
//! rate — a deduction, not a tax credit.

use serde::Serialize;

/// Hard cap on the number of scheduled deduction years. Investment beyond
/// `ceiling × MAX_SCHEDULE_YEARS` is not deductible at all.
pub const MAX_SCHEDULE_YEARS: usize = 5;

/// One scheduled year of the deduction plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyDeduction {
    /// Year index, 1-based.
    pub year: usize,
    /// Amount deducted from taxable income this year (XPF).
    pub deduction: f64,
    /// Tax saved this year: `deduction × marginal rate` (XPF).
    pub tax_saving: f64,
}

/// A complete deduction schedule.
///
/// Invariants: at most [`MAX_SCHEDULE_YEARS`] entries, each `deduction` at
/// most the ceiling, and `deductible_total` equal to the sum of scheduled
/// deductions, i.e. `min(investment, ceiling × 5)`.
#[derive(Debug, Clone, Serialize)]
pub struct FiscalDeductionPlan {
    /// Total amount that will actually be deducted (XPF).
    pub deductible_total: f64,
    /// Marginal rate applied (%).
    pub marginal_rate_pct: f64,
    /// Per-year schedule, year 1 first.
    pub years: Vec<YearlyDeduction>,
}

impl FiscalDeductionPlan {
    /// Number of scheduled years.
    pub fn scheduled_years(&self) -> usize {
        self.years.len()
    }

    /// Total tax saved over the whole schedule (XPF).
    pub fn total_tax_saving(&self) -> f64 {
        self.years.iter().map(|y| y.tax_saving).sum()
    }

    /// Tax saving for a given 1-based year, 0.0 outside the schedule.
    pub fn saving_for_year(&self, year: usize) -> f64 {
        self.years
            .iter()
            .find(|y| y.year == year)
            .map_or(0.0, |y| y.tax_saving)
    }
}

/// Spreads an investment over deduction years under the annual ceiling.
///
/// Year count = `ceil(investment / ceiling)`, capped at five. Each year
/// deducts `min(remaining, ceiling)`; the zero bracket still gets a full
/// schedule with zero savings (useful for display). A non-positive ceiling
/// yields an empty plan rather than a division fault.
pub fn schedule_deduction(
    investment: f64,
    marginal_rate_pct: f64,
    annual_ceiling: f64,
) -> FiscalDeductionPlan {
    if annual_ceiling <= 0.0 || investment <= 0.0 {
        return FiscalDeductionPlan {
            deductible_total: 0.0,
            marginal_rate_pct,
            years: Vec::new(),
        };
    }

    let year_cap = ((investment / annual_ceiling).ceil() as usize).min(MAX_SCHEDULE_YEARS);

    let mut years = Vec::with_capacity(year_cap);
    let mut remaining = investment;
    for year in 1..=year_cap {
        if remaining <= 0.0 {
            break;
        }
        let deduction = remaining.min(annual_ceiling);
        years.push(YearlyDeduction {
            year,
            deduction,
            tax_saving: deduction * marginal_rate_pct / 100.0,
        });
        remaining -= deduction;
    }

    FiscalDeductionPlan {
        deductible_total: years.iter().map(|y| y.deduction).sum(),
        marginal_rate_pct,
        years,
    }
}
