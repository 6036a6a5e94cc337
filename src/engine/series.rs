//! Calendar constants and the twelve-month energy series type.

use std::fmt;
use std::ops::Index;

use serde::Serialize;

/// Number of months in a calculation year.
pub const MONTHS_PER_YEAR: usize = 12;

/// Days per calendar month, January first. No leap-year handling — annual
/// totals use a 365-day year.
pub const DAYS_IN_MONTH: [u32; MONTHS_PER_YEAR] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Short month labels for reports and CSV export, January first.
pub const MONTH_LABELS: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Total days in the calculation year.
pub fn days_per_year() -> f64 {
    DAYS_IN_MONTH.iter().map(|&d| f64::from(d)).sum()
}

/// An ordered sequence of twelve non-negative monthly values (kWh or XPF),
/// index 0 = January.
///
/// Used for production, consumption, self-consumption, surplus, and purchase
/// series. Values are plain `f64`; invariant enforcement (non-negativity)
/// is the producer's responsibility — the allocator clamps, the caller
/// supplies validated consumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySeries([f64; MONTHS_PER_YEAR]);

impl MonthlySeries {
    /// Wraps twelve monthly values.
    pub fn new(values: [f64; MONTHS_PER_YEAR]) -> Self {
        Self(values)
    }

    /// A series of twelve zeros.
    pub fn zeros() -> Self {
        Self([0.0; MONTHS_PER_YEAR])
    }

    /// Builds a series by evaluating `f` for each month index 0..12.
    pub fn from_fn(f: impl Fn(usize) -> f64) -> Self {
        let mut values = [0.0; MONTHS_PER_YEAR];
        for (i, v) in values.iter_mut().enumerate() {
            *v = f(i);
        }
        Self(values)
    }

    /// Spreads an annual total across months, weighted by days per month.
    ///
    /// This is how an annual consumption scalar becomes a monthly series:
    /// `month[i] = annual × days[i] / 365`.
    pub fn spread_annual(annual: f64) -> Self {
        let year_days = days_per_year();
        Self::from_fn(|i| annual * f64::from(DAYS_IN_MONTH[i]) / year_days)
    }

    /// The underlying twelve values.
    pub fn values(&self) -> &[f64; MONTHS_PER_YEAR] {
        &self.0
    }

    /// Sum over all twelve months.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Largest monthly value (0.0 for an all-zero series).
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::MIN, f64::max).max(0.0)
    }

    /// Applies `f` to each month.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_fn(|i| f(self.0[i]))
    }

    /// Combines two series month by month.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::from_fn(|i| f(self.0[i], other.0[i]))
    }

    /// Multiplies every month by a scalar.
    pub fn scale(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// Iterator over the twelve values.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl Index<usize> for MonthlySeries {
    type Output = f64;

    fn index(&self, month: usize) -> &f64 {
        &self.0[month]
    }
}

impl fmt::Display for MonthlySeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "  ")?;
            }
            write!(f, "{}={:.0}", MONTH_LABELS[i], v)?;
        }
        Ok(())
    }
}
