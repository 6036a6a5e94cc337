//! Monthly energy-flow allocation between self-consumption, grid export,
//! and grid purchase.

use serde::Serialize;

use super::series::MonthlySeries;

/// Monthly split of production and consumption into the three grid flows.
///
/// Invariants (up to floating rounding), for every month `i`:
/// - `self_consumption[i] + surplus[i] == production[i]`
/// - `self_consumption[i] + purchase[i] == consumption[i]`
/// - all three series are non-negative
#[derive(Debug, Clone, Serialize)]
pub struct EnergyFlows {
    /// PV energy consumed on site, directly or via battery (kWh).
    pub self_consumption: MonthlySeries,
    /// PV energy exported to the grid (kWh).
    pub surplus: MonthlySeries,
    /// Energy bought from the grid (kWh).
    pub purchase: MonthlySeries,
}

impl EnergyFlows {
    /// Annual self-consumption rate as a percentage of production.
    ///
    /// `None` when annual production is zero — the rate is undefined rather
    /// than zero, and callers decide how to present that.
    pub fn self_consumption_rate_pct(&self, production: &MonthlySeries) -> Option<f64> {
        let produced = production.total();
        if produced > 0.0 {
            Some(self.self_consumption.total() / produced * 100.0)
        } else {
            None
        }
    }
}

/// How monthly production is matched against monthly consumption.
///
/// All three policies produce the same output shape; they differ only in
/// how much production counts as self-consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AllocationPolicy {
    /// No storage: production only offsets the daytime share of consumption.
    Direct {
        /// Fraction of consumption occurring while the sun is up.
        day_ratio: f64,
    },
    /// Battery store-and-shift: daytime surplus additionally covers evening
    /// consumption.
    ///
    /// Monthly-aggregate energy balance, not a per-cycle simulation: the
    /// shifted energy is not capped by any battery's usable capacity. The
    /// selected battery model is sizing information only.
    BatteryShift {
        /// Fraction of consumption occurring while the sun is up.
        day_ratio: f64,
    },
    /// Fixed self-consumption share of production, the commercial estimate.
    FixedShare {
        /// Fraction of production consumed on site, in [0, 1].
        share: f64,
    },
}

impl AllocationPolicy {
    /// Splits production against consumption month by month.
    pub fn allocate(
        &self,
        production: &MonthlySeries,
        consumption: &MonthlySeries,
    ) -> EnergyFlows {
        let self_consumption = match *self {
            Self::Direct { day_ratio } => production
                .zip_with(consumption, |prod, conso| prod.min(conso * day_ratio)),
            Self::BatteryShift { day_ratio } => {
                production.zip_with(consumption, |prod, conso| {
                    let day_conso = conso * day_ratio;
                    let direct = prod.min(day_conso);
                    let day_surplus = (prod - direct).max(0.0);
                    let evening_conso = conso * (1.0 - day_ratio);
                    let shifted = day_surplus.min(evening_conso);
                    direct + shifted
                })
            }
            Self::FixedShare { share } => production
                .zip_with(consumption, |prod, conso| (prod * share).min(conso)),
        };

        let surplus = production.zip_with(&self_consumption, |prod, auto| (prod - auto).max(0.0));
        let purchase =
            consumption.zip_with(&self_consumption, |conso, auto| (conso - auto).max(0.0));

        EnergyFlows {
            self_consumption,
            surplus,
            purchase,
        }
    }
}
