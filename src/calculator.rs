//! Calculation orchestration: wires the engine components into the four
//! calculation modes and assembles the reports the presentation layer
//! consumes.

use std::fmt;

use serde::Serialize;

use crate::catalog::{self, BatteryModel, OccupancyProfile};
use crate::config::{ConfigError, ScenarioConfig, TariffConfig};
use crate::engine::allocation::{AllocationPolicy, EnergyFlows};
use crate::engine::amortization::{AmortizationInputs, AmortizationRow, build_table, payback_year};
use crate::engine::billing::{BillingSummary, TariffTier};
use crate::engine::fiscal::FiscalDeductionPlan;
use crate::engine::production::YieldCache;
use crate::engine::series::MonthlySeries;
use crate::engine::sizing::{
    BatteryRecommendation, CatalogComparisonRow, catalog_comparison, evening_need_kwh,
    recommend_battery,
};

/// Pool pump supplement added to every month's consumption (kWh).
pub const POOL_EXTRA_KWH_PER_MONTH: f64 = 350.0;

/// Roof area per panel (m²).
const PANEL_AREA_M2: f64 = 2.0;

/// Inputs for the residential annual-consumption mode.
#[derive(Debug, Clone)]
pub struct ResidentialRequest {
    /// Installed peak capacity (kWc).
    pub capacity_kwc: f64,
    /// Unit panel power (Wc).
    pub panel_watt: f64,
    /// Annual consumption (kWh).
    pub annual_consumption_kwh: f64,
    /// Pool pump supplement flag.
    pub pool: bool,
    /// Occupancy profile.
    pub profile: OccupancyProfile,
    /// Optional battery pick. In this mode the battery contributes
    /// investment and a replacement charge only; the allocation stays
    /// direct (the metered with-battery mode models the shift).
    pub battery: Option<BatteryModel>,
    /// Marginal tax rate (%).
    pub marginal_rate_pct: f64,
    /// Residential tier flag.
    pub high_tier: bool,
}

/// Inputs for the metered with-battery mode.
#[derive(Debug, Clone)]
pub struct BatteryUpgradeRequest {
    /// Installed peak capacity (kWc).
    pub capacity_kwc: f64,
    /// Unit panel power (Wc).
    pub panel_watt: f64,
    /// Twelve metered monthly readings (kWh).
    pub monthly_consumption_kwh: MonthlySeries,
    /// Occupancy profile.
    pub profile: OccupancyProfile,
    /// Selected battery model.
    pub battery: BatteryModel,
    /// Marginal tax rate (%).
    pub marginal_rate_pct: f64,
    /// Residential tier flag.
    pub high_tier: bool,
}

/// Inputs for the battery-sizing mode.
#[derive(Debug, Clone)]
pub struct BatterySizingRequest {
    /// Installed peak capacity (kWc).
    pub capacity_kwc: f64,
    /// Annual consumption (kWh).
    pub annual_consumption_kwh: f64,
    /// Occupancy profile.
    pub profile: OccupancyProfile,
    /// Desired evening coverage (%).
    pub night_coverage_pct: f64,
}

/// Inputs for the commercial mode.
#[derive(Debug, Clone)]
pub struct CommercialRequest {
    /// Installed peak capacity (kWc).
    pub capacity_kwc: f64,
    /// Unit panel power (Wc).
    pub panel_watt: f64,
    /// Annual consumption (kWh).
    pub annual_consumption_kwh: f64,
    /// Share of production consumed on site, in [0, 1].
    pub self_consumption_share: f64,
    /// Total investment override (XPF).
    pub investment_override: Option<f64>,
    /// Energy rate override (XPF/kWh).
    pub rate_override: Option<f64>,
    /// Feed-in rate override (XPF/kWh).
    pub feed_in_override: Option<f64>,
    /// Escalation override (%/year).
    pub escalation_override: Option<f64>,
}

/// Physical layout and investment breakdown of the installation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SystemSizing {
    /// Installed peak capacity (kWc).
    pub capacity_kwc: f64,
    /// Number of panels: `ceil(capacity × 1000 / panel_watt)`.
    pub panel_count: u32,
    /// Roof area, two square metres per panel (m²).
    pub array_area_m2: f64,
    /// PV hardware and installation cost (XPF).
    pub pv_investment: f64,
    /// Battery cost, 0 without one (XPF).
    pub battery_investment: f64,
    /// Total initial investment (XPF).
    pub total_investment: f64,
}

impl SystemSizing {
    fn new(capacity_kwc: f64, panel_watt: f64, pv_cost_per_wc: f64, battery_investment: f64) -> Self {
        let panel_count = (capacity_kwc * 1000.0 / panel_watt).ceil() as u32;
        let pv_investment = capacity_kwc * 1000.0 * pv_cost_per_wc;
        Self {
            capacity_kwc,
            panel_count,
            array_area_m2: f64::from(panel_count) * PANEL_AREA_M2,
            pv_investment,
            battery_investment,
            total_investment: pv_investment + battery_investment,
        }
    }
}

/// Monthly series plus their annual aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct EnergyBalance {
    /// Monthly PV production (kWh).
    pub production: MonthlySeries,
    /// Monthly consumption (kWh).
    pub consumption: MonthlySeries,
    /// The allocated flows.
    pub flows: EnergyFlows,
    /// Annual production total (kWh).
    pub annual_production: f64,
    /// Annual consumption total (kWh).
    pub annual_consumption: f64,
    /// Annual self-consumption total (kWh).
    pub annual_self_consumption: f64,
    /// Annual surplus total (kWh).
    pub annual_surplus: f64,
    /// Annual purchase total (kWh).
    pub annual_purchase: f64,
    /// Self-consumption rate; absent when production is zero (%).
    pub self_consumption_rate_pct: Option<f64>,
}

impl EnergyBalance {
    fn new(production: MonthlySeries, consumption: MonthlySeries, flows: EnergyFlows) -> Self {
        let self_consumption_rate_pct = flows.self_consumption_rate_pct(&production);
        Self {
            annual_production: production.total(),
            annual_consumption: consumption.total(),
            annual_self_consumption: flows.self_consumption.total(),
            annual_surplus: flows.surplus.total(),
            annual_purchase: flows.purchase.total(),
            self_consumption_rate_pct,
            production,
            consumption,
            flows,
        }
    }
}

/// Selected battery as it appears in a report.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatterySummary {
    /// The catalog model.
    pub model: BatteryModel,
    /// Usable capacity (kWh).
    pub usable_kwh: f64,
    /// Battery investment (XPF).
    pub investment: f64,
}

/// Complete result of one economic evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Calculation mode this report came from.
    pub mode: &'static str,
    /// Layout and investment.
    pub sizing: SystemSizing,
    /// Energy series and aggregates.
    pub balance: EnergyBalance,
    /// Annual bills and savings.
    pub billing: BillingSummary,
    /// Deduction schedule embedded in the amortization.
    pub fiscal: FiscalDeductionPlan,
    /// Year-by-year amortization over the system lifetime.
    pub amortization: Vec<AmortizationRow>,
    /// First year the cumulative balance turns non-negative, if any.
    pub payback_year: Option<u32>,
    /// Selected battery, when one is part of the installation.
    pub battery: Option<BatterySummary>,
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Evaluation ({}) ---", self.mode)?;
        writeln!(
            f,
            "Installation:          {:.1} kWc, {} panels ({:.0} m²)",
            self.sizing.capacity_kwc, self.sizing.panel_count, self.sizing.array_area_m2
        )?;
        writeln!(
            f,
            "Annual production:     {:.0} kWh",
            self.balance.annual_production
        )?;
        match self.balance.self_consumption_rate_pct {
            Some(rate) => writeln!(f, "Self-consumption rate: {rate:.1}%")?,
            None => writeln!(f, "Self-consumption rate: n/a (no production)")?,
        }
        if let Some(bat) = &self.battery {
            writeln!(
                f,
                "Battery:               {} ({:.2} kWh usable, {:.0} XPF)",
                bat.model.label, bat.usable_kwh, bat.investment
            )?;
        }
        writeln!(
            f,
            "Investment:            {:.0} XPF",
            self.sizing.total_investment
        )?;
        writeln!(
            f,
            "Bill without PV:       {:.0} XPF/year",
            self.billing.without_pv
        )?;
        writeln!(
            f,
            "Bill with PV:          {:.0} XPF/year",
            self.billing.with_pv
        )?;
        writeln!(
            f,
            "Annual savings:        {:.0} XPF",
            self.billing.savings
        )?;
        writeln!(
            f,
            "Fiscal saving:         {:.0} XPF over {} year(s)",
            self.fiscal.total_tax_saving(),
            self.fiscal.scheduled_years()
        )?;
        match self.payback_year {
            Some(year) => write!(f, "Payback:               year {year}"),
            None => write!(f, "Payback:               not reached within lifetime"),
        }
    }
}

/// Result of the battery-sizing mode.
#[derive(Debug, Clone, Serialize)]
pub struct SizingReport {
    /// The recommendation.
    pub recommendation: BatteryRecommendation,
    /// Full catalog comparison against the same need.
    pub comparison: Vec<CatalogComparisonRow>,
    /// Monthly PV production behind the estimate (kWh).
    pub production: MonthlySeries,
    /// Monthly evening consumption the target was derived from (kWh).
    pub evening_consumption: MonthlySeries,
    /// PV investment (XPF).
    pub pv_investment: f64,
    /// Recommended battery investment (XPF).
    pub battery_investment: f64,
    /// PV plus battery (XPF).
    pub total_investment: f64,
}

impl fmt::Display for SizingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rec = &self.recommendation;
        writeln!(f, "--- Battery recommendation ---")?;
        writeln!(f, "Model:            {}", rec.model.label)?;
        writeln!(f, "Usable capacity:  {:.2} kWh", rec.usable_kwh)?;
        writeln!(f, "Evening need:     {:.2} kWh", rec.need_kwh)?;
        writeln!(f, "Coverage:         {:.0}%", rec.coverage_pct)?;
        writeln!(f, "Battery cost:     {:.0} XPF", self.battery_investment)?;
        write!(f, "Total investment: {:.0} XPF", self.total_investment)
    }
}

/// The calculation entry point: an immutable tariff snapshot plus the
/// bounded production cache, the engine's only mutable state.
#[derive(Debug)]
pub struct Calculator {
    tariffs: TariffConfig,
    yield_cache: YieldCache,
}

impl Calculator {
    /// Creates a calculator over one tariff snapshot.
    pub fn new(tariffs: TariffConfig) -> Self {
        Self {
            tariffs,
            yield_cache: YieldCache::default(),
        }
    }

    /// The tariff snapshot this calculator works from.
    pub fn tariffs(&self) -> &TariffConfig {
        &self.tariffs
    }

    fn production(&mut self, capacity_kwc: f64) -> MonthlySeries {
        self.yield_cache.get_or_compute(
            capacity_kwc,
            self.tariffs.irradiance,
            self.tariffs.system_loss_pct,
        )
    }

    fn tier(high: bool) -> TariffTier {
        if high { TariffTier::High } else { TariffTier::Low }
    }

    /// Residential evaluation from an annual consumption scalar.
    pub fn evaluate_residential(&mut self, req: &ResidentialRequest) -> EvaluationReport {
        let mut annual = req.annual_consumption_kwh;
        if req.pool {
            annual += POOL_EXTRA_KWH_PER_MONTH * 12.0;
        }
        let consumption = MonthlySeries::spread_annual(annual);
        let production = self.production(req.capacity_kwc);

        let flows = AllocationPolicy::Direct {
            day_ratio: req.profile.day_ratio,
        }
        .allocate(&production, &consumption);

        let battery = req.battery.map(|model| BatterySummary {
            model,
            usable_kwh: model.usable_kwh(),
            investment: model.nominal_kwh * self.tariffs.battery_cost_per_kwh,
        });
        let battery_investment = battery.map_or(0.0, |b| b.investment);

        let sizing = SystemSizing::new(
            req.capacity_kwc,
            req.panel_watt,
            self.tariffs.pv_cost_residential_per_wc,
            battery_investment,
        );

        let billing = BillingSummary::residential(
            &consumption,
            &flows,
            &production,
            &self.tariffs,
            Self::tier(req.high_tier),
        );

        let (replacement_cost, replacement_year) = match &battery {
            Some(b) => (b.investment, self.tariffs.battery_lifetime_years),
            None => (0.0, 0),
        };

        let (amortization, fiscal) = build_table(&AmortizationInputs {
            investment: sizing.total_investment,
            first_year_saving: billing.savings,
            escalation_pct: self.tariffs.tariff_escalation_pct,
            lifetime_years: self.tariffs.system_lifetime_years,
            marginal_rate_pct: req.marginal_rate_pct,
            deduction_ceiling: self.tariffs.deduction_ceiling,
            replacement_cost,
            replacement_year,
        });
        let payback = payback_year(&amortization);

        EvaluationReport {
            mode: "residential",
            sizing,
            balance: EnergyBalance::new(production, consumption, flows),
            billing,
            fiscal,
            amortization,
            payback_year: payback,
            battery,
        }
    }

    /// Residential evaluation from twelve metered readings with the
    /// two-stage battery allocation.
    pub fn evaluate_with_battery(&mut self, req: &BatteryUpgradeRequest) -> EvaluationReport {
        let consumption = req.monthly_consumption_kwh;
        let production = self.production(req.capacity_kwc);

        let flows = AllocationPolicy::BatteryShift {
            day_ratio: req.profile.day_ratio,
        }
        .allocate(&production, &consumption);

        let battery = BatterySummary {
            model: req.battery,
            usable_kwh: req.battery.usable_kwh(),
            investment: req.battery.nominal_kwh * self.tariffs.battery_cost_per_kwh,
        };

        let sizing = SystemSizing::new(
            req.capacity_kwc,
            req.panel_watt,
            self.tariffs.pv_cost_residential_per_wc,
            battery.investment,
        );

        let billing = BillingSummary::residential(
            &consumption,
            &flows,
            &production,
            &self.tariffs,
            Self::tier(req.high_tier),
        );

        let (amortization, fiscal) = build_table(&AmortizationInputs {
            investment: sizing.total_investment,
            first_year_saving: billing.savings,
            escalation_pct: self.tariffs.tariff_escalation_pct,
            lifetime_years: self.tariffs.system_lifetime_years,
            marginal_rate_pct: req.marginal_rate_pct,
            deduction_ceiling: self.tariffs.deduction_ceiling,
            replacement_cost: battery.investment,
            replacement_year: self.tariffs.battery_lifetime_years,
        });
        let payback = payback_year(&amortization);

        EvaluationReport {
            mode: "with_battery",
            sizing,
            balance: EnergyBalance::new(production, consumption, flows),
            billing,
            fiscal,
            amortization,
            payback_year: payback,
            battery: Some(battery),
        }
    }

    /// Battery recommendation for a night-autonomy target.
    pub fn size_battery(&mut self, req: &BatterySizingRequest) -> SizingReport {
        let consumption = MonthlySeries::spread_annual(req.annual_consumption_kwh);
        let production = self.production(req.capacity_kwc);
        let evening_consumption = consumption.scale(req.profile.evening_ratio());

        let need = evening_need_kwh(
            &consumption,
            req.profile.evening_ratio(),
            req.night_coverage_pct / 100.0,
        );
        let recommendation = recommend_battery(need);
        let comparison = catalog_comparison(need, self.tariffs.battery_cost_per_kwh);

        let pv_investment =
            req.capacity_kwc * 1000.0 * self.tariffs.pv_cost_residential_per_wc;
        let battery_investment =
            recommendation.model.nominal_kwh * self.tariffs.battery_cost_per_kwh;

        SizingReport {
            recommendation,
            comparison,
            production,
            evening_consumption,
            pv_investment,
            battery_investment,
            total_investment: pv_investment + battery_investment,
        }
    }

    /// Commercial evaluation on the fixed-share allocation, billed without
    /// fixed charges and amortized on the zero fiscal bracket.
    pub fn evaluate_commercial(&mut self, req: &CommercialRequest) -> EvaluationReport {
        let consumption = MonthlySeries::spread_annual(req.annual_consumption_kwh);
        let production = self.production(req.capacity_kwc);

        let flows = AllocationPolicy::FixedShare {
            share: req.self_consumption_share,
        }
        .allocate(&production, &consumption);

        let rate = req.rate_override.unwrap_or(self.tariffs.commercial_rate);
        let feed_in = req
            .feed_in_override
            .unwrap_or(self.tariffs.feed_in_commercial);
        let escalation = req
            .escalation_override
            .unwrap_or(self.tariffs.tariff_escalation_pct);

        let billing = BillingSummary::commercial(
            consumption.total(),
            &flows,
            rate,
            feed_in,
            self.tariffs.turnover_tax_pct,
        );

        let mut sizing = SystemSizing::new(
            req.capacity_kwc,
            req.panel_watt,
            self.tariffs.pv_cost_commercial_per_wc,
            0.0,
        );
        if let Some(investment) = req.investment_override {
            sizing.pv_investment = investment;
            sizing.total_investment = investment;
        }

        let (amortization, fiscal) = build_table(&AmortizationInputs {
            investment: sizing.total_investment,
            first_year_saving: billing.savings,
            escalation_pct: escalation,
            lifetime_years: self.tariffs.system_lifetime_years,
            marginal_rate_pct: 0.0,
            deduction_ceiling: self.tariffs.deduction_ceiling,
            replacement_cost: 0.0,
            replacement_year: 0,
        });
        let payback = payback_year(&amortization);

        EvaluationReport {
            mode: "commercial",
            sizing,
            balance: EnergyBalance::new(production, consumption, flows),
            billing,
            fiscal,
            amortization,
            payback_year: payback,
            battery: None,
        }
    }
}

/// Outcome of running a scenario file: most modes produce an evaluation,
/// sizing mode produces a recommendation.
#[derive(Debug, Clone, Serialize)]
pub enum ScenarioOutcome {
    /// A full economic evaluation.
    Evaluation(EvaluationReport),
    /// A battery recommendation.
    Sizing(SizingReport),
}

impl fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evaluation(report) => report.fmt(f),
            Self::Sizing(report) => report.fmt(f),
        }
    }
}

/// Builds the request for a validated scenario and runs it.
///
/// # Errors
///
/// Returns a `ConfigError` when a catalog lookup fails — callers are
/// expected to have run [`ScenarioConfig::validate`] first, so this only
/// trips on configs that skipped validation.
pub fn run_scenario(cfg: &ScenarioConfig) -> Result<ScenarioOutcome, ConfigError> {
    let profile = *catalog::occupancy_profile(&cfg.site.profile).ok_or_else(|| ConfigError {
        field: "site.profile".into(),
        message: format!("unknown profile \"{}\"", cfg.site.profile),
    })?;

    let battery = if cfg.battery.model.is_empty() {
        None
    } else {
        Some(
            *catalog::battery_model(&cfg.battery.model).ok_or_else(|| ConfigError {
                field: "battery.model".into(),
                message: format!("unknown battery model \"{}\"", cfg.battery.model),
            })?,
        )
    };

    let monthly = cfg.consumption.monthly_kwh.as_ref().map(|values| {
        let mut months = [0.0; 12];
        for (slot, value) in months.iter_mut().zip(values.iter()) {
            *slot = *value;
        }
        MonthlySeries::new(months)
    });

    let mut calculator = Calculator::new(cfg.tariffs.clone());

    match cfg.mode.as_str() {
        "residential" => Ok(ScenarioOutcome::Evaluation(calculator.evaluate_residential(
            &ResidentialRequest {
                capacity_kwc: cfg.site.capacity_kwc,
                panel_watt: cfg.site.panel_watt,
                annual_consumption_kwh: cfg.consumption.annual_kwh,
                pool: cfg.consumption.pool,
                profile,
                battery,
                marginal_rate_pct: cfg.fiscal.marginal_rate_pct,
                high_tier: cfg.site.high_tier,
            },
        ))),
        "with_battery" => {
            let battery = battery.ok_or_else(|| ConfigError {
                field: "battery.model".into(),
                message: "required when mode = \"with_battery\"".into(),
            })?;
            let consumption = monthly
                .unwrap_or_else(|| MonthlySeries::spread_annual(cfg.consumption.annual_kwh));
            Ok(ScenarioOutcome::Evaluation(calculator.evaluate_with_battery(
                &BatteryUpgradeRequest {
                    capacity_kwc: cfg.site.capacity_kwc,
                    panel_watt: cfg.site.panel_watt,
                    monthly_consumption_kwh: consumption,
                    profile,
                    battery,
                    marginal_rate_pct: cfg.fiscal.marginal_rate_pct,
                    high_tier: cfg.site.high_tier,
                },
            )))
        }
        "battery_sizing" => Ok(ScenarioOutcome::Sizing(calculator.size_battery(
            &BatterySizingRequest {
                capacity_kwc: cfg.site.capacity_kwc,
                annual_consumption_kwh: cfg.consumption.annual_kwh,
                profile,
                night_coverage_pct: cfg.battery.night_coverage_pct,
            },
        ))),
        "commercial" => Ok(ScenarioOutcome::Evaluation(calculator.evaluate_commercial(
            &CommercialRequest {
                capacity_kwc: cfg.site.capacity_kwc,
                panel_watt: cfg.site.panel_watt,
                annual_consumption_kwh: cfg.consumption.annual_kwh,
                self_consumption_share: cfg.commercial.self_consumption_share_pct / 100.0,
                investment_override: cfg.commercial.investment_override,
                rate_override: cfg.commercial.rate_override,
                feed_in_override: cfg.commercial.feed_in_override,
                escalation_override: cfg.commercial.escalation_override,
            },
        ))),
        other => Err(ConfigError {
            field: "mode".into(),
            message: format!("unknown mode \"{other}\""),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> Calculator {
        Calculator::new(TariffConfig::default())
    }

    fn active_profile() -> OccupancyProfile {
        *catalog::occupancy_profile("active").expect("catalog profile")
    }

    fn residential_request() -> ResidentialRequest {
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

    #[test]
    fn residential_panel_count_rounds_up() {
        let mut calc = calculator();
        let report = calc.evaluate_residential(&residential_request());
        // 3000 Wc / 400 Wc = 7.5 → 8 panels, 16 m²
        assert_eq!(report.sizing.panel_count, 8);
        assert!((report.sizing.array_area_m2 - 16.0).abs() < 1e-9);
    }

    #[test]
    fn residential_investment_from_cost_per_wc() {
        let mut calc = calculator();
        let report = calc.evaluate_residential(&residential_request());
        assert!((report.sizing.pv_investment - 3.0 * 1000.0 * 350.0).abs() < 1e-6);
        assert_eq!(report.sizing.battery_investment, 0.0);
    }

    #[test]
    fn pool_adds_monthly_supplement() {
        let mut calc = calculator();
        let mut req = residential_request();
        req.pool = true;
        let report = calc.evaluate_residential(&req);
        let expected = 4500.0 + 350.0 * 12.0;
        assert!((report.balance.annual_consumption - expected).abs() < 1e-6);
    }

    #[test]
    fn residential_battery_affects_investment_not_allocation() {
        let mut calc = calculator();
        let without = calc.evaluate_residential(&residential_request());

        let mut req = residential_request();
        req.battery = catalog::battery_model("Prestige").copied();
        let with = calc.evaluate_residential(&req);

        // Same energy split, higher investment, replacement scheduled.
        assert_eq!(
            with.balance.annual_self_consumption,
            without.balance.annual_self_consumption
        );
        assert!((with.sizing.battery_investment - 10.65 * 85_000.0).abs() < 1e-6);
        assert!(with.sizing.total_investment > without.sizing.total_investment);
        let replacement_total: f64 = with.amortization.iter().map(|r| r.replacement_cost).sum();
        assert!((replacement_total - with.sizing.battery_investment).abs() < 1e-6);
        assert!(
            (with.amortization[9].replacement_cost - with.sizing.battery_investment).abs() < 1e-6,
            "replacement lands at the battery lifetime year"
        );
    }

    #[test]
    fn with_battery_beats_direct_self_consumption() {
        let mut calc = calculator();
        let direct = calc.evaluate_residential(&residential_request());

        let upgrade = BatteryUpgradeRequest {
            capacity_kwc: 3.0,
            panel_watt: 400.0,
            monthly_consumption_kwh: MonthlySeries::spread_annual(4500.0),
            profile: active_profile(),
            battery: *catalog::battery_model("Prestige").expect("catalog model"),
            marginal_rate_pct: 30.0,
            high_tier: false,
        };
        let shifted = calc.evaluate_with_battery(&upgrade);

        assert!(
            shifted.balance.annual_self_consumption >= direct.balance.annual_self_consumption
        );
        assert_eq!(shifted.mode, "with_battery");
        assert!(shifted.battery.is_some());
    }

    #[test]
    fn sizing_reports_consistent_investment() {
        let mut calc = calculator();
        let report = calc.size_battery(&BatterySizingRequest {
            capacity_kwc: 3.0,
            annual_consumption_kwh: 4500.0,
            profile: active_profile(),
            night_coverage_pct: 50.0,
        });
        assert!(
            (report.total_investment - report.pv_investment - report.battery_investment).abs()
                < 1e-9
        );
        assert_eq!(report.comparison.len(), 3);
        assert_eq!(
            report
                .comparison
                .iter()
                .filter(|row| row.recommended)
                .count(),
            1
        );
    }

    #[test]
    fn sizing_need_matches_profile_evening_share() {
        let mut calc = calculator();
        let report = calc.size_battery(&BatterySizingRequest {
            capacity_kwc: 3.0,
            annual_consumption_kwh: 4500.0,
            profile: active_profile(),
            night_coverage_pct: 50.0,
        });
        // Worst month is any 31-day month: 4500 × 31/365 × 0.75 × 0.5
        let expected = 4500.0 * 31.0 / 365.0 * 0.75 * 0.5;
        assert!((report.recommendation.need_kwh - expected).abs() < 1e-9);
    }

    #[test]
    fn commercial_uses_fixed_share_and_zero_bracket() {
        let mut calc = calculator();
        let report = calc.evaluate_commercial(&CommercialRequest {
            capacity_kwc: 20.0,
            panel_watt: 400.0,
            annual_consumption_kwh: 20_000.0,
            self_consumption_share: 0.7,
            investment_override: None,
            rate_override: None,
            feed_in_override: None,
            escalation_override: None,
        });
        assert_eq!(report.mode, "commercial");
        assert_eq!(report.fiscal.total_tax_saving(), 0.0);
        assert!((report.sizing.pv_investment - 20.0 * 1000.0 * 300.0).abs() < 1e-6);
        assert!(report.battery.is_none());
    }

    #[test]
    fn commercial_investment_override_wins() {
        let mut calc = calculator();
        let report = calc.evaluate_commercial(&CommercialRequest {
            capacity_kwc: 20.0,
            panel_watt: 400.0,
            annual_consumption_kwh: 20_000.0,
            self_consumption_share: 0.7,
            investment_override: Some(5_000_000.0),
            rate_override: None,
            feed_in_override: None,
            escalation_override: None,
        });
        assert_eq!(report.sizing.total_investment, 5_000_000.0);
        assert!((report.amortization[0].cumulative_balance
            - (report.amortization[0].net_benefit - 5_000_000.0))
            .abs()
            < 1e-6);
    }

    #[test]
    fn run_scenario_covers_all_presets() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name).expect("preset");
            let outcome = run_scenario(&cfg);
            assert!(outcome.is_ok(), "preset \"{name}\" should run");
        }
    }

    #[test]
    fn run_scenario_rejects_unknown_mode() {
        let mut cfg = ScenarioConfig::default();
        cfg.mode = "industrial".to_string();
        let outcome = run_scenario(&cfg);
        assert!(outcome.is_err());
    }

    #[test]
    fn report_display_does_not_panic() {
        let mut calc = calculator();
        let report = calc.evaluate_residential(&residential_request());
        let s = format!("{report}");
        assert!(s.contains("Payback"));
    }
}
