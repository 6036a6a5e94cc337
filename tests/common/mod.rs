//! Shared test fixtures for integration tests.

use pv_econ::calculator::{
    BatterySizingRequest, BatteryUpgradeRequest, Calculator, CommercialRequest, ResidentialRequest,
};
use pv_econ::catalog::{self, BatteryModel, OccupancyProfile};
use pv_econ::config::TariffConfig;
use pv_econ::engine::series::MonthlySeries;

/// Default tariff snapshot (published 2024 rates).
pub fn default_tariffs() -> TariffConfig {
    TariffConfig::default()
}

/// Calculator over the default tariffs.
pub fn default_calculator() -> Calculator {
    Calculator::new(default_tariffs())
}

/// The "active household" profile (day ratio 0.25).
pub fn active_profile() -> OccupancyProfile {
    *catalog::occupancy_profile("active").expect("catalog profile")
}

/// The mid-range catalog battery.
pub fn prestige_battery() -> BatteryModel {
    *catalog::battery_model("Prestige").expect("catalog model")
}

/// Default residential request: 3 kWc, 4 500 kWh/year, no battery.
pub fn default_residential() -> ResidentialRequest {
    ResidentialRequest {
        capacity_kwc: 3.0,
        panel_watt: 400.0,
        annual_consumption_kwh: 4500.0,
        pool: false,
        profile: active_profile(),
        battery: None,
        marginal_rate_pct: 30.0,
        high_tier: false,
    }
}

/// Default metered with-battery request: flat 375 kWh months, Prestige.
pub fn default_battery_upgrade() -> BatteryUpgradeRequest {
    BatteryUpgradeRequest {
        capacity_kwc: 3.0,
        panel_watt: 400.0,
        monthly_consumption_kwh: MonthlySeries::new([375.0; 12]),
        profile: active_profile(),
        battery: prestige_battery(),
        marginal_rate_pct: 30.0,
        high_tier: false,
    }
}

/// Default sizing request: 50% night coverage.
pub fn default_sizing() -> BatterySizingRequest {
    BatterySizingRequest {
        capacity_kwc: 3.0,
        annual_consumption_kwh: 4500.0,
        profile: active_profile(),
        night_coverage_pct: 50.0,
    }
}

/// Default commercial request: 20 kWc, 20 MWh/year, 70% share.
pub fn default_commercial() -> CommercialRequest {
    CommercialRequest {
        capacity_kwc: 20.0,
        panel_watt: 400.0,
        annual_consumption_kwh: 20_000.0,
        self_consumption_share: 0.7,
        investment_override: None,
        rate_override: None,
        feed_in_override: None,
        escalation_override: None,
    }
}
