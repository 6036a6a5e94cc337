//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog;
use crate::engine::series::MONTHS_PER_YEAR;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the published utility tariffs and a
/// 3 kWc residential baseline. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use a named preset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Calculation mode: `"residential"`, `"with_battery"`,
    /// `"battery_sizing"`, or `"commercial"`.
    pub mode: String,
    /// Tariff and jurisdiction parameters.
    pub tariffs: TariffConfig,
    /// Installation parameters.
    pub site: SiteConfig,
    /// Consumption inputs.
    pub consumption: ConsumptionConfig,
    /// Battery selection and sizing target.
    pub battery: BatteryChoice,
    /// Fiscal bracket selection.
    pub fiscal: FiscalChoice,
    /// Commercial-mode overrides.
    pub commercial: CommercialConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            mode: "residential".to_string(),
            tariffs: TariffConfig::default(),
            site: SiteConfig::default(),
            consumption: ConsumptionConfig::default(),
            battery: BatteryChoice::default(),
            fiscal: FiscalChoice::default(),
            commercial: CommercialConfig::default(),
        }
    }
}

/// Immutable tariff and jurisdiction parameter set.
///
/// One snapshot per calculation; the engine never mutates it. Defaults are
/// the utility's published 2024 residential and commercial tariffs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Residential energy rate, low tier (XPF/kWh).
    pub residential_low_rate: f64,
    /// Residential energy rate, high tier (XPF/kWh).
    pub residential_high_rate: f64,
    /// Commercial energy rate, before tax (XPF/kWh).
    pub commercial_rate: f64,
    /// Feed-in rate for residential surplus (XPF/kWh).
    pub feed_in_residential: f64,
    /// Feed-in rate for commercial surplus (XPF/kWh).
    pub feed_in_commercial: f64,
    /// Fixed standing charge (XPF/month).
    pub standing_charge_monthly: f64,
    /// Municipal tax (XPF/month).
    pub municipal_tax_monthly: f64,
    /// Metering fee (XPF/month).
    pub metering_fee_monthly: f64,
    /// Turnover-style consumption tax (%).
    pub turnover_tax_pct: f64,
    /// Site irradiance (kWh per kWc per day).
    pub irradiance: f64,
    /// System losses (%), 0 inclusive to 100 exclusive.
    pub system_loss_pct: f64,
    /// Annual tariff escalation (%/year).
    pub tariff_escalation_pct: f64,
    /// PV system lifetime (years).
    pub system_lifetime_years: u32,
    /// Battery lifetime before replacement (years).
    pub battery_lifetime_years: u32,
    /// Annual fiscal-deduction ceiling (XPF/year).
    pub deduction_ceiling: f64,
    /// Residential installation cost (XPF per Wc).
    pub pv_cost_residential_per_wc: f64,
    /// Commercial installation cost (XPF per Wc).
    pub pv_cost_commercial_per_wc: f64,
    /// Battery cost (XPF per nominal kWh).
    pub battery_cost_per_kwh: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            residential_low_rate: 37.91,
            residential_high_rate: 42.24,
            commercial_rate: 29.62,
            feed_in_residential: 21.0,
            feed_in_commercial: 15.0,
            standing_charge_monthly: 608.42,
            municipal_tax_monthly: 9.0,
            metering_fee_monthly: 703.0,
            turnover_tax_pct: 3.0,
            irradiance: 4.2,
            system_loss_pct: 15.0,
            tariff_escalation_pct: 5.0,
            system_lifetime_years: 25,
            battery_lifetime_years: 10,
            deduction_ceiling: 1_000_000.0,
            pv_cost_residential_per_wc: 350.0,
            pv_cost_commercial_per_wc: 300.0,
            battery_cost_per_kwh: 85_000.0,
        }
    }
}

impl TariffConfig {
    /// Sum of the fixed monthly bill components: standing charge, municipal
    /// tax, and metering fee.
    pub fn fixed_monthly_charges(&self) -> f64 {
        self.standing_charge_monthly + self.municipal_tax_monthly + self.metering_fee_monthly
    }
}

/// Installation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Installed peak capacity (kWc, must be > 0).
    pub capacity_kwc: f64,
    /// Unit panel power (Wc, must be > 0) — drives the panel count.
    pub panel_watt: f64,
    /// Occupancy profile key (see the profile catalog).
    pub profile: String,
    /// Whether the dwelling bills on the high residential tier.
    pub high_tier: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            capacity_kwc: 3.0,
            panel_watt: 400.0,
            profile: "active".to_string(),
            high_tier: false,
        }
    }
}

/// Consumption inputs: an annual scalar, or twelve metered monthly values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    /// Annual consumption (kWh), spread over months by day count when no
    /// monthly readings are given.
    pub annual_kwh: f64,
    /// Twelve metered monthly readings (kWh), January first. Takes
    /// precedence over `annual_kwh` when present.
    pub monthly_kwh: Option<Vec<f64>>,
    /// Pool pump supplement: adds 350 kWh to every month.
    pub pool: bool,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            annual_kwh: 4500.0,
            monthly_kwh: None,
            pool: false,
        }
    }
}

/// Battery selection and night-autonomy target.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryChoice {
    /// Battery model label from the catalog, or empty for none.
    pub model: String,
    /// Desired evening-consumption coverage for sizing mode (%).
    pub night_coverage_pct: f64,
}

impl Default for BatteryChoice {
    fn default() -> Self {
        Self {
            model: String::new(),
            night_coverage_pct: 50.0,
        }
    }
}

/// Fiscal bracket selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FiscalChoice {
    /// Marginal income-tax rate (%), one of the catalog bracket values.
    pub marginal_rate_pct: f64,
}

impl Default for FiscalChoice {
    fn default() -> Self {
        Self {
            marginal_rate_pct: 30.0,
        }
    }
}

/// Commercial-mode inputs and overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommercialConfig {
    /// Estimated share of production consumed on site (%).
    pub self_consumption_share_pct: f64,
    /// Total investment override (XPF); derived from capacity and the
    /// commercial cost rate when absent.
    pub investment_override: Option<f64>,
    /// Energy rate override (XPF/kWh); falls back to the tariff table.
    pub rate_override: Option<f64>,
    /// Feed-in rate override (XPF/kWh); falls back to the tariff table.
    pub feed_in_override: Option<f64>,
    /// Tariff escalation override (%/year); falls back to the tariff table.
    pub escalation_override: Option<f64>,
}

impl Default for CommercialConfig {
    fn default() -> Self {
        Self {
            self_consumption_share_pct: 70.0,
            investment_override: None,
            rate_override: None,
            feed_in_override: None,
            escalation_override: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariffs.irradiance"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

/// Recognized calculation modes.
pub const MODES: &[&str] = &["residential", "with_battery", "battery_sizing", "commercial"];

impl ScenarioConfig {
    /// Returns the residential baseline preset: 3 kWc, active profile,
    /// 4 500 kWh/year, no battery.
    pub fn residential_baseline() -> Self {
        Self::default()
    }

    /// Returns the battery-retrofit preset: twelve metered readings and a
    /// mid-range battery on the two-stage allocation.
    pub fn battery_retrofit() -> Self {
        Self {
            mode: "with_battery".to_string(),
            consumption: ConsumptionConfig {
                monthly_kwh: Some(vec![375.0; MONTHS_PER_YEAR]),
                ..ConsumptionConfig::default()
            },
            battery: BatteryChoice {
                model: "Prestige".to_string(),
                ..BatteryChoice::default()
            },
            ..Self::default()
        }
    }

    /// Returns the commercial-site preset: 20 kWc, 20 MWh/year, fixed
    /// 70% self-consumption share, zero fiscal bracket.
    pub fn commercial_site() -> Self {
        Self {
            mode: "commercial".to_string(),
            site: SiteConfig {
                capacity_kwc: 20.0,
                ..SiteConfig::default()
            },
            consumption: ConsumptionConfig {
                annual_kwh: 20_000.0,
                ..ConsumptionConfig::default()
            },
            fiscal: FiscalChoice {
                marginal_rate_pct: 0.0,
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["residential_baseline", "battery_retrofit", "commercial_site"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "residential_baseline" => Ok(Self::residential_baseline()),
            "battery_retrofit" => Ok(Self::battery_retrofit()),
            "commercial_site" => Ok(Self::commercial_site()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !MODES.contains(&self.mode.as_str()) {
            errors.push(ConfigError {
                field: "mode".into(),
                message: format!("must be one of {}, got \"{}\"", MODES.join(", "), self.mode),
            });
        }

        let t = &self.tariffs;
        if t.irradiance <= 0.0 {
            errors.push(ConfigError {
                field: "tariffs.irradiance".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..100.0).contains(&t.system_loss_pct) {
            errors.push(ConfigError {
                field: "tariffs.system_loss_pct".into(),
                message: "must be in [0, 100)".into(),
            });
        }
        if t.tariff_escalation_pct < 0.0 {
            errors.push(ConfigError {
                field: "tariffs.tariff_escalation_pct".into(),
                message: "must be >= 0".into(),
            });
        }
        if t.system_lifetime_years == 0 {
            errors.push(ConfigError {
                field: "tariffs.system_lifetime_years".into(),
                message: "must be > 0".into(),
            });
        }
        if t.deduction_ceiling < 0.0 {
            errors.push(ConfigError {
                field: "tariffs.deduction_ceiling".into(),
                message: "must be >= 0".into(),
            });
        }
        for (field, value) in [
            ("tariffs.residential_low_rate", t.residential_low_rate),
            ("tariffs.residential_high_rate", t.residential_high_rate),
            ("tariffs.commercial_rate", t.commercial_rate),
            ("tariffs.feed_in_residential", t.feed_in_residential),
            ("tariffs.feed_in_commercial", t.feed_in_commercial),
            ("tariffs.pv_cost_residential_per_wc", t.pv_cost_residential_per_wc),
            ("tariffs.pv_cost_commercial_per_wc", t.pv_cost_commercial_per_wc),
            ("tariffs.battery_cost_per_kwh", t.battery_cost_per_kwh),
        ] {
            if value < 0.0 {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be >= 0".into(),
                });
            }
        }

        let s = &self.site;
        if s.capacity_kwc <= 0.0 {
            errors.push(ConfigError {
                field: "site.capacity_kwc".into(),
                message: "must be > 0".into(),
            });
        }
        if s.panel_watt <= 0.0 {
            errors.push(ConfigError {
                field: "site.panel_watt".into(),
                message: "must be > 0".into(),
            });
        }
        if catalog::occupancy_profile(&s.profile).is_none() {
            let keys: Vec<&str> = catalog::OCCUPANCY_PROFILES.iter().map(|p| p.key).collect();
            errors.push(ConfigError {
                field: "site.profile".into(),
                message: format!("must be one of {}, got \"{}\"", keys.join(", "), s.profile),
            });
        }

        let c = &self.consumption;
        if let Some(monthly) = &c.monthly_kwh {
            if monthly.len() != MONTHS_PER_YEAR {
                errors.push(ConfigError {
                    field: "consumption.monthly_kwh".into(),
                    message: format!("must hold exactly 12 values, got {}", monthly.len()),
                });
            }
            if monthly.iter().any(|v| *v < 0.0) {
                errors.push(ConfigError {
                    field: "consumption.monthly_kwh".into(),
                    message: "values must be >= 0".into(),
                });
            }
        } else if c.annual_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "consumption.annual_kwh".into(),
                message: "must be > 0".into(),
            });
        }

        let b = &self.battery;
        if !b.model.is_empty() && catalog::battery_model(&b.model).is_none() {
            let labels: Vec<&str> = catalog::BATTERY_MODELS.iter().map(|m| m.label).collect();
            errors.push(ConfigError {
                field: "battery.model".into(),
                message: format!("must be one of {}, got \"{}\"", labels.join(", "), b.model),
            });
        }
        if self.mode == "with_battery" && b.model.is_empty() {
            errors.push(ConfigError {
                field: "battery.model".into(),
                message: "required when mode = \"with_battery\"".into(),
            });
        }
        if !(0.0..=100.0).contains(&b.night_coverage_pct) {
            errors.push(ConfigError {
                field: "battery.night_coverage_pct".into(),
                message: "must be in [0, 100]".into(),
            });
        }

        if catalog::fiscal_bracket(self.fiscal.marginal_rate_pct).is_none() {
            let rates: Vec<String> = catalog::FISCAL_BRACKETS
                .iter()
                .map(|b| format!("{}", b.rate_pct))
                .collect();
            errors.push(ConfigError {
                field: "fiscal.marginal_rate_pct".into(),
                message: format!(
                    "must be one of {}, got {}",
                    rates.join(", "),
                    self.fiscal.marginal_rate_pct
                ),
            });
        }

        let com = &self.commercial;
        if !(0.0..=100.0).contains(&com.self_consumption_share_pct) {
            errors.push(ConfigError {
                field: "commercial.self_consumption_share_pct".into(),
                message: "must be in [0, 100]".into(),
            });
        }

        errors
    }
}
