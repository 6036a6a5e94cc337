//! Fixed catalogs: occupancy profiles, battery models, and fiscal brackets.
//!
//! Small closed tables of records, looked up by key or scanned in declared
//! order. None of them is user-extensible; catalog order matters for the
//! battery recommender's first-qualifying rule.

use serde::Serialize;

/// How a household splits its consumption between daylight and evening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OccupancyProfile {
    /// Stable lookup key used in scenario files.
    pub key: &'static str,
    /// Human-readable description.
    pub label: &'static str,
    /// Fraction of daily consumption drawn while production is available.
    pub day_ratio: f64,
}

impl OccupancyProfile {
    /// Fraction of daily consumption drawn after dark.
    pub fn evening_ratio(&self) -> f64 {
        1.0 - self.day_ratio
    }
}

/// The occupancy profile catalog.
pub const OCCUPANCY_PROFILES: [OccupancyProfile; 3] = [
    OccupancyProfile {
        key: "active",
        label: "Active household, mostly away during the day",
        day_ratio: 0.25,
    },
    OccupancyProfile {
        key: "retired",
        label: "Retired household, present during the day",
        day_ratio: 0.55,
    },
    OccupancyProfile {
        key: "family",
        label: "Family with school-age children",
        day_ratio: 0.50,
    },
];

/// Looks up an occupancy profile by key.
pub fn occupancy_profile(key: &str) -> Option<&'static OccupancyProfile> {
    OCCUPANCY_PROFILES.iter().find(|p| p.key == key)
}

/// Usable fraction of a battery's nominal capacity before deep-discharge
/// degradation. System-wide constant, not per-model.
pub const BATTERY_DEPTH_OF_DISCHARGE: f64 = 0.85;

/// A battery model from the supplier lineup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatteryModel {
    /// Commercial model name.
    pub label: &'static str,
    /// Nameplate capacity in kWh.
    pub nominal_kwh: f64,
}

impl BatteryModel {
    /// Usable capacity after the depth-of-discharge derating.
    pub fn usable_kwh(&self) -> f64 {
        self.nominal_kwh * BATTERY_DEPTH_OF_DISCHARGE
    }
}

/// The battery catalog, ordered smallest to largest by nominal capacity.
pub const BATTERY_MODELS: [BatteryModel; 3] = [
    BatteryModel {
        label: "Elite",
        nominal_kwh: 4.8,
    },
    BatteryModel {
        label: "Prestige",
        nominal_kwh: 10.65,
    },
    BatteryModel {
        label: "Maestro",
        nominal_kwh: 14.336,
    },
];

/// Looks up a battery model by label.
pub fn battery_model(label: &str) -> Option<&'static BatteryModel> {
    BATTERY_MODELS.iter().find(|m| m.label == label)
}

/// A marginal income-tax bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiscalBracket {
    /// Marginal rate in percent.
    pub rate_pct: f64,
    /// Bracket description.
    pub label: &'static str,
}

/// Marginal brackets of the jurisdiction's income-tax code, ascending.
pub const FISCAL_BRACKETS: [FiscalBracket; 5] = [
    FiscalBracket {
        rate_pct: 0.0,
        label: "Non-taxable",
    },
    FiscalBracket {
        rate_pct: 15.0,
        label: "15% bracket",
    },
    FiscalBracket {
        rate_pct: 25.0,
        label: "25% bracket",
    },
    FiscalBracket {
        rate_pct: 30.0,
        label: "30% bracket",
    },
    FiscalBracket {
        rate_pct: 40.0,
        label: "40% bracket",
    },
];

/// Looks up the bracket carrying exactly this marginal rate.
pub fn fiscal_bracket(rate_pct: f64) -> Option<&'static FiscalBracket> {
    FISCAL_BRACKETS.iter().find(|b| b.rate_pct == rate_pct)
}
