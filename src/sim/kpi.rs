//! Post-hoc financial KPIs derived from the yearly cash-flow records.

use std::fmt;

use serde::Serialize;

use super::types::YearlyPrediction;

/// NPV discount rate used when neither a discount rate nor a loan rate is set (%).
pub const DEFAULT_DISCOUNT_RATE_PCT: f64 = 4.5;

/// Investment figures the KPIs are measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Investment {
    /// Construction cost after the investment tax credit.
    pub construction_cost: f64,
    pub equity: f64,
    /// NPV discount rate as a fraction.
    pub discount_rate: f64,
}

/// Aggregate indicators of a complete 20-year run.
///
/// Computed post-hoc from the yearly records so that reported metrics and
/// per-year data never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiReport {
    pub total_generation_mwh: f64,
    /// Final cumulative cash flow.
    pub total_net_profit: f64,
    /// Final cumulative cash flow over the equity, or over the construction
    /// cost for a fully debt-financed plant (%).
    pub roi: f64,
    /// `None` if the cumulative cash flow never turns non-negative.
    pub payback_period: Option<f64>,
    pub npv: f64,
    /// Lifecycle cost (construction, O&M, interest, tax) per kWh generated.
    pub lcoe: f64,
}

/// Resolves the NPV discount rate (%) from the configured value, the loan
/// rate, or the default.
pub fn discount_rate_pct(configured: Option<f64>, loan_rate_pct: f64) -> f64 {
    match configured {
        Some(rate) => rate,
        None if loan_rate_pct != 0.0 => loan_rate_pct,
        None => DEFAULT_DISCOUNT_RATE_PCT,
    }
}

/// Fractional year in which the cumulative cash flow first reaches zero.
///
/// Interpolated within that year as `(year − 1) + deficit / net`.
pub fn payback_period(yearly: &[YearlyPrediction], equity: f64) -> Option<f64> {
    let mut previous = -equity;
    for y in yearly {
        if y.cumulative_cash_flow >= 0.0 {
            let fraction = if y.net_revenue > 0.0 {
                -previous / y.net_revenue
            } else {
                0.0
            };
            return Some(f64::from(y.year - 1) + fraction);
        }
        previous = y.cumulative_cash_flow;
    }
    None
}

/// Return on investment (%) for a final cumulative cash flow.
pub fn roi(final_cumulative: f64, inv: &Investment) -> f64 {
    let base = if inv.equity > 0.0 {
        inv.equity
    } else {
        inv.construction_cost
    };
    if base > 0.0 {
        final_cumulative / base * 100.0
    } else {
        0.0
    }
}

impl KpiReport {
    /// Computes all KPIs from the complete yearly record vector.
    ///
    /// # Arguments
    ///
    /// * `yearly` - Yearly predictions in year order
    /// * `inv` - Construction cost, equity, and discount rate
    ///
    /// # Returns
    ///
    /// A `KpiReport` with all fields populated. An empty record vector
    /// yields zeros and no payback.
    pub fn from_yearly(yearly: &[YearlyPrediction], inv: &Investment) -> Self {
        let mut generation = 0.0;
        let mut lifecycle_cost = inv.construction_cost;
        let mut discounted = 0.0;
        for y in yearly {
            generation += y.annual_generation;
            lifecycle_cost += y.maintenance_cost + y.interest_payment + y.corporate_tax;
            discounted += y.net_revenue / (1.0 + inv.discount_rate).powf(f64::from(y.year));
        }
        let total_net_profit = yearly.last().map_or(0.0, |y| y.cumulative_cash_flow);

        Self {
            total_generation_mwh: generation / 1000.0,
            total_net_profit,
            roi: roi(total_net_profit, inv),
            payback_period: payback_period(yearly, inv.equity),
            npv: discounted - inv.equity,
            lcoe: if generation > 0.0 {
                lifecycle_cost / generation
            } else {
                0.0
            },
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Total generation:      {:.1} MWh", self.total_generation_mwh)?;
        writeln!(f, "Net profit:            {:.0}", self.total_net_profit)?;
        writeln!(f, "ROI:                   {:.1}%", self.roi)?;
        match self.payback_period {
            Some(years) => writeln!(f, "Payback period:        {years:.2} years")?,
            None => writeln!(f, "Payback period:        not reached")?,
        }
        writeln!(f, "NPV:                   {:.0}", self.npv)?;
        write!(f, "LCOE:                  {:.2} /kWh", self.lcoe)
    }
}
