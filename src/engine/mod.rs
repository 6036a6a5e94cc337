//! The calculation engine: pure functions from validated inputs to
//! structured numeric outputs.

/// Energy-flow allocation policies.
pub mod allocation;
/// Year-by-year amortization table and payback.
pub mod amortization;
/// Tiered-tariff billing.
pub mod billing;
/// Income-abatement deduction scheduling.
pub mod fiscal;
/// Monthly PV yield model and memo cache.
pub mod production;
/// Calendar constants and the monthly series type.
pub mod series;
/// Battery recommendation.
pub mod sizing;

// Re-export the main types for convenience
pub use allocation::{AllocationPolicy, EnergyFlows};
pub use amortization::{AmortizationInputs, AmortizationRow, build_table, payback_year};
pub use billing::{BillingSummary, TariffTier};
pub use fiscal::{FiscalDeductionPlan, schedule_deduction};
pub use production::{YieldCache, monthly_yield};
pub use series::MonthlySeries;
pub use sizing::{BatteryRecommendation, recommend_battery};
