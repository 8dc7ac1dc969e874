//! Economic simulation outputs.

use std::fmt;

use serde::Serialize;

use super::bess::BessResult;
use super::environment::EnvironmentalImpact;
use super::generation::GenerationMode;
use super::kpi::KpiReport;
use super::losses::LossStep;

/// Analysis horizon (years).
pub const ANALYSIS_YEARS: u32 = 20;

/// Cash-flow record of one simulation year. Monetary values in the
/// configured currency, energy in kWh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyPrediction {
    /// Simulation year, 1-based.
    pub year: u32,
    /// Module output relative to year one (%).
    pub efficiency_rate: f64,
    pub annual_generation: f64,
    pub monthly_avg_generation: f64,
    pub gross_revenue: f64,
    /// O&M plus land lease.
    pub maintenance_cost: f64,
    pub loan_payment: f64,
    pub interest_payment: f64,
    pub principal_payment: f64,
    /// Loan balance after this year's payment.
    pub remaining_principal: f64,
    pub depreciation: f64,
    /// Floored at 0; losses are not carried forward.
    pub taxable_income: f64,
    pub corporate_tax: f64,
    /// Net cash flow of the year.
    pub net_revenue: f64,
    /// Running total starting from minus the equity contribution.
    pub cumulative_cash_flow: f64,
}

impl fmt::Display for YearlyPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year {:>2}: gen {:.0} kWh, revenue {:.0}, net {:.0}, cumulative {:.0}",
            self.year,
            self.annual_generation,
            self.gross_revenue,
            self.net_revenue,
            self.cumulative_cash_flow
        )
    }
}

/// Outcome of one price scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityResult {
    pub scenario: &'static str,
    /// Price variation applied to the active revenue model (%).
    pub price_variation_pct: f64,
    /// Final cumulative cash flow plus the equity contribution.
    pub net_profit: f64,
    pub roi: f64,
    pub payback_period: Option<f64>,
}

/// Complete 20-year economic result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// DC capacity the simulation ran for (kW).
    pub capacity_kw: f64,
    pub dc_ac_ratio: f64,
    /// Generation mode actually used.
    pub generation_mode: GenerationMode,
    pub yearly: Vec<YearlyPrediction>,
    /// Totals, ROI, payback, NPV, and LCOE.
    #[serde(flatten)]
    pub kpis: KpiReport,
    pub total_gross_revenue: f64,
    /// Construction cost after the investment tax credit.
    pub total_construction_cost: f64,
    pub equity_amount: f64,
    pub loan_amount: f64,
    pub total_maintenance_cost: f64,
    pub total_loan_interest: f64,
    pub total_tax: f64,
    pub clipping_loss_pct: f64,
    pub iam_loss_pct: f64,
    /// Year-one generation per month (kWh).
    pub monthly_generation: [f64; 12],
    /// Mean daily insolation per month (h/day).
    pub monthly_avg_insolation: [f64; 12],
    /// Year-one generation per hour of an average day (kWh).
    pub hourly_generation: [f64; 24],
    pub environmental_impact: EnvironmentalImpact,
    /// Pessimistic, base, and optimistic scenarios, in that order.
    pub sensitivity: Vec<SensitivityResult>,
    pub loss_waterfall: Vec<LossStep>,
    /// Performance ratio at the end of the loss waterfall (%).
    pub waterfall_final_pr: f64,
    pub bess: Option<BessResult>,
}

impl SimulationResult {
    /// Prediction for `year` (1-based), if within the horizon.
    pub fn year(&self, year: u32) -> Option<&YearlyPrediction> {
        self.yearly.iter().find(|y| y.year == year)
    }

    /// Final cumulative cash flow, or 0 for an empty result.
    pub fn final_cumulative_cash_flow(&self) -> f64 {
        self.yearly.last().map_or(0.0, |y| y.cumulative_cash_flow)
    }
}
