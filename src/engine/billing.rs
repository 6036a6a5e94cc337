//! Tariff billing: monthly and annual bills with and without the PV system.

use serde::Serialize;

use crate::config::TariffConfig;

use super::allocation::EnergyFlows;
use super::series::{MONTHS_PER_YEAR, MonthlySeries};

/// Residential tariff tier, chosen by the caller from the dwelling's
/// consumption band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TariffTier {
    /// Low-consumption tier.
    Low,
    /// High-consumption tier.
    High,
}

impl TariffTier {
    /// The energy rate for this tier (XPF/kWh).
    pub fn rate(self, tariffs: &TariffConfig) -> f64 {
        match self {
            Self::Low => tariffs.residential_low_rate,
            Self::High => tariffs.residential_high_rate,
        }
    }
}

/// One month's residential bill (XPF).
///
/// `energy × tier rate × (1 + tax) + fixed charges − surplus feed-in`.
/// Purchased energy and exported surplus are floored at zero; a bill can
/// still go negative when the feed-in credit exceeds the rest.
pub fn residential_monthly_bill(
    consumption_kwh: f64,
    self_consumption_kwh: f64,
    production_kwh: f64,
    tariffs: &TariffConfig,
    tier: TariffTier,
) -> f64 {
    let tax = tariffs.turnover_tax_pct / 100.0;
    let purchase = (consumption_kwh - self_consumption_kwh).max(0.0);
    let surplus = (production_kwh - self_consumption_kwh).max(0.0);
    let energy_cost = purchase * tier.rate(tariffs) * (1.0 + tax);
    let feed_in_credit = surplus * tariffs.feed_in_residential;
    energy_cost + tariffs.fixed_monthly_charges() - feed_in_credit
}

/// Annual residential bill: sum of the twelve monthly bills (XPF).
pub fn residential_annual_bill(
    consumption: &MonthlySeries,
    self_consumption: &MonthlySeries,
    production: &MonthlySeries,
    tariffs: &TariffConfig,
    tier: TariffTier,
) -> f64 {
    (0..MONTHS_PER_YEAR)
        .map(|m| {
            residential_monthly_bill(
                consumption[m],
                self_consumption[m],
                production[m],
                tariffs,
                tier,
            )
        })
        .sum()
}

/// Annual commercial bill (XPF): purchased energy at the pre-tax rate plus
/// turnover tax, less the surplus feed-in credit. No fixed charges.
pub fn commercial_annual_bill(
    purchase_kwh: f64,
    surplus_kwh: f64,
    rate: f64,
    feed_in_rate: f64,
    turnover_tax_pct: f64,
) -> f64 {
    purchase_kwh * rate * (1.0 + turnover_tax_pct / 100.0) - surplus_kwh * feed_in_rate
}

/// Annual bills with and without the PV system, and the difference.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BillingSummary {
    /// Annual bill with self-consumption forced to zero (XPF).
    pub without_pv: f64,
    /// Annual bill with the PV system (XPF).
    pub with_pv: f64,
    /// `without_pv − with_pv` (XPF); can be negative.
    pub savings: f64,
}

impl BillingSummary {
    /// Residential summary. The baseline recomputes every month with zero
    /// self-consumption and zero production, so no feed-in credit leaks in.
    pub fn residential(
        consumption: &MonthlySeries,
        flows: &EnergyFlows,
        production: &MonthlySeries,
        tariffs: &TariffConfig,
        tier: TariffTier,
    ) -> Self {
        let zeros = MonthlySeries::zeros();
        let without_pv = residential_annual_bill(consumption, &zeros, &zeros, tariffs, tier);
        let with_pv =
            residential_annual_bill(consumption, &flows.self_consumption, production, tariffs, tier);
        Self {
            without_pv,
            with_pv,
            savings: without_pv - with_pv,
        }
    }

    /// Commercial summary using annual flow totals.
    pub fn commercial(
        annual_consumption_kwh: f64,
        flows: &EnergyFlows,
        rate: f64,
        feed_in_rate: f64,
        turnover_tax_pct: f64,
    ) -> Self {
        let without_pv =
            commercial_annual_bill(annual_consumption_kwh, 0.0, rate, feed_in_rate, turnover_tax_pct);
        let with_pv = commercial_annual_bill(
            flows.purchase.total(),
            flows.surplus.total(),
            rate,
            feed_in_rate,
            turnover_tax_pct,
        );
        Self {
            without_pv,
            with_pv,
            savings: without_pv - with_pv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::allocation::AllocationPolicy;
    use crate::engine::production::monthly_yield;

    fn tariffs() -> TariffConfig {
        TariffConfig::default()
    }

    #[test]
    fn monthly_bill_without_pv_is_energy_plus_fixed() {
        let t = tariffs();
        let bill = residential_monthly_bill(375.0, 0.0, 0.0, &t, TariffTier::Low);
        let expected = 375.0 * 37.91 * 1.03 + t.fixed_monthly_charges();
        assert!((bill - expected).abs() < 1e-9);
    }

    #[test]
    fn high_tier_bills_more() {
        let t = tariffs();
        let low = residential_monthly_bill(375.0, 0.0, 0.0, &t, TariffTier::Low);
        let high = residential_monthly_bill(375.0, 0.0, 0.0, &t, TariffTier::High);
        assert!(high > low);
    }

    #[test]
    fn self_consumption_reduces_the_bill() {
        let t = tariffs();
        let without = residential_monthly_bill(375.0, 0.0, 0.0, &t, TariffTier::Low);
        let with = residential_monthly_bill(375.0, 90.0, 90.0, &t, TariffTier::Low);
        assert!(with < without);
    }

    #[test]
    fn surplus_credit_can_turn_the_bill_negative() {
        let t = tariffs();
        // Tiny consumption fully covered, huge surplus exported.
        let bill = residential_monthly_bill(50.0, 50.0, 2000.0, &t, TariffTier::Low);
        assert!(bill < 0.0);
    }

    #[test]
    fn overproduction_never_yields_negative_purchase() {
        let t = tariffs();
        // Self-consumption equals consumption: energy cost is exactly zero.
        let bill = residential_monthly_bill(100.0, 100.0, 100.0, &t, TariffTier::Low);
        assert!((bill - t.fixed_monthly_charges()).abs() < 1e-9);
    }

    #[test]
    fn annual_bill_is_sum_of_months() {
        let t = tariffs();
        let conso = MonthlySeries::spread_annual(4500.0);
        let zeros = MonthlySeries::zeros();
        let annual = residential_annual_bill(&conso, &zeros, &zeros, &t, TariffTier::Low);
        let monthly_sum: f64 = (0..12)
            .map(|m| residential_monthly_bill(conso[m], 0.0, 0.0, &t, TariffTier::Low))
            .sum();
        assert!((annual - monthly_sum).abs() < 1e-9);
    }

    #[test]
    fn residential_summary_savings_match_difference() {
        let t = tariffs();
        let prod = monthly_yield(3.0, 4.2, 15.0);
        let conso = MonthlySeries::spread_annual(4500.0);
        let flows = AllocationPolicy::Direct { day_ratio: 0.55 }.allocate(&prod, &conso);
        let summary = BillingSummary::residential(&conso, &flows, &prod, &t, TariffTier::Low);
        assert!((summary.savings - (summary.without_pv - summary.with_pv)).abs() < 1e-9);
        assert!(summary.savings > 0.0, "a sunny site should save money");
    }

    #[test]
    fn commercial_bill_has_no_fixed_charges() {
        let bill = commercial_annual_bill(0.0, 0.0, 29.62, 15.0, 3.0);
        assert_eq!(bill, 0.0);
    }

    #[test]
    fn commercial_summary_baseline_taxes_full_consumption() {
        let prod = monthly_yield(20.0, 4.2, 15.0);
        let conso = MonthlySeries::spread_annual(20_000.0);
        let flows = AllocationPolicy::FixedShare { share: 0.7 }.allocate(&prod, &conso);
        let summary = BillingSummary::commercial(conso.total(), &flows, 29.62, 15.0, 3.0);
        let expected_baseline = 20_000.0 * 29.62 * 1.03;
        assert!((summary.without_pv - expected_baseline).abs() < 1e-6);
        assert!(summary.with_pv < summary.without_pv);
    }
}
