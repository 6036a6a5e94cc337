//! Integration tests for the commercial evaluation mode.

mod common;

use pv_econ::engine::series::MONTHS_PER_YEAR;

#[test]
fn commercial_run_balances_energy_every_month() {
    let mut calc = common::default_calculator();
    let report = calc.evaluate_commercial(&common::default_commercial());
    let balance = &report.balance;

    for m in 0..MONTHS_PER_YEAR {
        assert!(
            (balance.flows.self_consumption[m] + balance.flows.surplus[m] - balance.production[m])
                .abs()
                < 1e-9
        );
        assert!(
            (balance.flows.self_consumption[m] + balance.flows.purchase[m]
                - balance.consumption[m])
                .abs()
                < 1e-9
        );
    }
}

#[test]
fn self_consumption_follows_the_fixed_share() {
    let mut calc = common::default_calculator();
    let report = calc.evaluate_commercial(&common::default_commercial());
    let balance = &report.balance;

    for m in 0..MONTHS_PER_YEAR {
        let share_bound = balance.production[m] * 0.7;
        let conso_bound = balance.consumption[m];
        let expected = share_bound.min(conso_bound);
        assert!(
            (balance.flows.self_consumption[m] - expected).abs() < 1e-9,
            "month {m} deviates from the fixed-share rule"
        );
    }
}

#[test]
fn commercial_baseline_is_flat_rate_on_full_consumption() {
    let mut calc = common::default_calculator();
    let report = calc.evaluate_commercial(&common::default_commercial());

    // No fixed charges in the commercial regime: the baseline is exactly
    // consumption × rate × (1 + tax).
    let expected = 20_000.0 * 29.62 * 1.03;
    assert!((report.billing.without_pv - expected).abs() < 1e-6);
    assert!(report.billing.savings > 0.0);
}

#[test]
fn commercial_amortization_has_no_fiscal_savings() {
    let mut calc = common::default_calculator();
    let report = calc.evaluate_commercial(&common::default_commercial());

    assert_eq!(report.fiscal.total_tax_saving(), 0.0);
    assert!(report.amortization.iter().all(|r| r.fiscal_saving == 0.0));
    assert!(report.amortization.iter().all(|r| r.replacement_cost == 0.0));
}

#[test]
fn rate_overrides_flow_through_billing() {
    let mut calc = common::default_calculator();
    let mut req = common::default_commercial();
    req.rate_override = Some(40.0);
    let report = calc.evaluate_commercial(&req);

    let expected_baseline = 20_000.0 * 40.0 * 1.03;
    assert!((report.billing.without_pv - expected_baseline).abs() < 1e-6);
}

#[test]
fn escalation_override_steepens_the_table() {
    let mut calc = common::default_calculator();
    let flat = {
        let mut req = common::default_commercial();
        req.escalation_override = Some(0.0);
        calc.evaluate_commercial(&req)
    };
    let steep = {
        let mut req = common::default_commercial();
        req.escalation_override = Some(8.0);
        calc.evaluate_commercial(&req)
    };

    // Year 1 identical, later years diverge.
    assert!(
        (flat.amortization[0].energy_saving - steep.amortization[0].energy_saving).abs() < 1e-6
    );
    assert!(steep.amortization[10].energy_saving > flat.amortization[10].energy_saving);
    // Zero escalation keeps the energy saving flat.
    assert!(
        (flat.amortization[0].energy_saving - flat.amortization[10].energy_saving).abs() < 1e-6
    );
}

#[test]
fn payback_year_is_first_non_negative_cumulative() {
    let mut calc = common::default_calculator();
    let report = calc.evaluate_commercial(&common::default_commercial());

    match report.payback_year {
        Some(y) => {
            for row in &report.amortization {
                if row.year < y {
                    assert!(row.cumulative_balance < 0.0);
                } else {
                    break;
                }
            }
            let row = &report.amortization[y as usize - 1];
            assert!(row.cumulative_balance >= 0.0);
        }
        None => {
            assert!(
                report
                    .amortization
                    .iter()
                    .all(|r| r.cumulative_balance < 0.0)
            );
        }
    }
}
