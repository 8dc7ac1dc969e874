//! Price sensitivity: the cash-flow loop re-run at ±10 % prices.

use super::cashflow::CashFlowModel;
use super::kpi::{payback_period, roi};
use super::types::SensitivityResult;

/// Scenario names and the factor applied to every price term.
pub const SCENARIOS: [(&str, f64); 3] = [
    ("Pessimistic (-10%)", 0.9),
    ("Base", 1.0),
    ("Optimistic (+10%)", 1.1),
];

/// Evaluates the pessimistic, base, and optimistic price scenarios.
pub fn analyze(model: &CashFlowModel) -> Vec<SensitivityResult> {
    let inv = model.investment();
    SCENARIOS
        .iter()
        .map(|&(scenario, factor)| {
            let yearly = model.run(factor);
            let cumulative = yearly.last().map_or(-model.equity, |y| y.cumulative_cash_flow);
            SensitivityResult {
                scenario,
                price_variation_pct: (factor - 1.0) * 100.0,
                net_profit: cumulative + model.equity,
                roi: roi(cumulative, &inv),
                payback_period: payback_period(&yearly, model.equity),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EconomicConfig;

    #[test]
    fn scenarios_are_ordered_by_profit() {
        let model = CashFlowModel::new(500.0, 650_000.0, &EconomicConfig::default());
        let results = analyze(&model);
        assert_eq!(results.len(), 3);
        assert!(results[2].net_profit > results[1].net_profit);
        assert!(results[1].net_profit > results[0].net_profit);
        assert!((results[0].price_variation_pct + 10.0).abs() < 1e-9);
    }

    #[test]
    fn base_scenario_matches_main_run() {
        let model = CashFlowModel::new(500.0, 650_000.0, &EconomicConfig::default());
        let base = &analyze(&model)[1];
        let main = model.run(1.0);
        let final_cumulative = main.last().map_or(0.0, |y| y.cumulative_cash_flow);
        assert!((base.net_profit - (final_cumulative + model.equity)).abs() < 1e-6);
        assert_eq!(base.payback_period, payback_period(&main, model.equity));
    }

    #[test]
    fn factor_applies_to_ppa_revenue() {
        let cfg = EconomicConfig {
            ppa_enabled: true,
            ppa_rate: 150.0,
            ..EconomicConfig::default()
        };
        let model = CashFlowModel::new(500.0, 650_000.0, &cfg);
        let results = analyze(&model);
        assert!(results[2].net_profit > results[0].net_profit);
    }
}
