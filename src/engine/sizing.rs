//! Battery recommendation against an evening-energy coverage target.

use serde::Serialize;

use crate::catalog::{BATTERY_MODELS, BatteryModel};

use super::series::MonthlySeries;

/// A recommended battery with its derived figures.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatteryRecommendation {
    /// The selected catalog model.
    pub model: BatteryModel,
    /// Usable capacity after depth-of-discharge derating (kWh).
    pub usable_kwh: f64,
    /// Target usable energy the recommendation was sized for (kWh).
    pub need_kwh: f64,
    /// Share of the need the model covers, capped at 100 (%).
    pub coverage_pct: f64,
}

/// One row of the catalog comparison table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogComparisonRow {
    /// Catalog model.
    pub model: BatteryModel,
    /// Usable capacity (kWh).
    pub usable_kwh: f64,
    /// Estimated cost at the configured per-kWh rate (XPF).
    pub estimated_cost: f64,
    /// Coverage of the need, capped at 100 (%).
    pub coverage_pct: f64,
    /// Whether this is the recommended model.
    pub recommended: bool,
}

/// Usable-energy target: the worst month's evening consumption scaled by
/// the desired coverage fraction.
pub fn evening_need_kwh(
    consumption: &MonthlySeries,
    evening_ratio: f64,
    coverage_fraction: f64,
) -> f64 {
    consumption.scale(evening_ratio).max() * coverage_fraction
}

fn coverage_pct(usable_kwh: f64, need_kwh: f64) -> f64 {
    if need_kwh <= 0.0 {
        100.0
    } else {
        (usable_kwh / need_kwh * 100.0).min(100.0)
    }
}

/// Picks the smallest catalog model whose usable capacity meets the need.
///
/// Scans the catalog in ascending capacity order; when nothing qualifies,
/// the largest model is returned as a best effort with coverage below 100%.
/// Always returns exactly one model.
pub fn recommend_battery(need_kwh: f64) -> BatteryRecommendation {
    let model = BATTERY_MODELS
        .iter()
        .find(|m| m.usable_kwh() >= need_kwh)
        .or_else(|| BATTERY_MODELS.last())
        .copied()
        .unwrap_or(BATTERY_MODELS[0]);

    let usable_kwh = model.usable_kwh();
    BatteryRecommendation {
        model,
        usable_kwh,
        need_kwh,
        coverage_pct: coverage_pct(usable_kwh, need_kwh),
    }
}

/// Builds the full catalog comparison for a given need and cost rate.
pub fn catalog_comparison(need_kwh: f64, cost_per_kwh: f64) -> Vec<CatalogComparisonRow> {
    let recommended = recommend_battery(need_kwh);
    BATTERY_MODELS
        .iter()
        .map(|m| CatalogComparisonRow {
            model: *m,
            usable_kwh: m.usable_kwh(),
            estimated_cost: m.nominal_kwh * cost_per_kwh,
            coverage_pct: coverage_pct(m.usable_kwh(), need_kwh),
            recommended: m.label == recommended.model.label,
        })
        .collect()
}
