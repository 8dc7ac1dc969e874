//! Twenty-year cash-flow simulation.

use super::bess::{BessConfig, simulate_bess};
use super::environment::EnvironmentalImpact;
use super::generation::estimate_generation;
use super::kpi::{Investment, KpiReport, discount_rate_pct};
use super::loan::Loan;
use super::losses::{loss_waterfall, waterfall_pr};
use super::sensitivity;
use super::types::{ANALYSIS_YEARS, SimulationResult, YearlyPrediction};
use crate::config::EconomicConfig;

/// Disagreement between declared and waterfall PR that is worth reporting (points).
const PR_MISMATCH_WARN_POINTS: f64 = 1.0;

/// How electricity is sold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevenueModel {
    /// Fixed power purchase agreement. Rates per kWh, escalation in percent.
    Ppa { rate: f64, escalation_pct: f64 },
    /// Spot price per kWh plus certificates per MWh times weight.
    Market {
        smp: f64,
        rec_price: f64,
        rec_weight: f64,
    },
}

impl RevenueModel {
    pub fn from_config(cfg: &EconomicConfig) -> Self {
        if cfg.ppa_enabled && cfg.ppa_rate > 0.0 {
            Self::Ppa {
                rate: cfg.ppa_rate,
                escalation_pct: cfg.ppa_escalation,
            }
        } else {
            Self::Market {
                smp: cfg.smp,
                rec_price: cfg.rec_price,
                rec_weight: cfg.rec_weight,
            }
        }
    }

    /// Gross revenue for `generation_kwh` sold in `year`, with every price
    /// term scaled by `price_factor`.
    pub fn revenue(&self, year: u32, generation_kwh: f64, price_factor: f64) -> f64 {
        match *self {
            Self::Ppa {
                rate,
                escalation_pct,
            } => {
                let escalated = rate * (1.0 + escalation_pct / 100.0).powf(f64::from(year - 1));
                generation_kwh * escalated * price_factor
            }
            Self::Market {
                smp,
                rec_price,
                rec_weight,
            } => {
                let energy = generation_kwh * smp;
                let certificates = generation_kwh / 1000.0 * rec_price * rec_weight;
                (energy + certificates) * price_factor
            }
        }
    }
}

/// Inputs of the yearly loop, derived once per run.
#[derive(Debug, Clone)]
pub struct CashFlowModel {
    /// Year-one generation (kWh).
    pub base_generation_kwh: f64,
    /// Construction cost after the investment tax credit.
    pub construction_cost: f64,
    pub equity: f64,
    pub loan_amount: f64,
    pub revenue: RevenueModel,
    /// Year-one O&M plus lease.
    base_operating_cost: f64,
    inflation: f64,
    degradation: f64,
    loan_rate_pct: f64,
    loan_term: u32,
    grace_period: u32,
    tax_rate: f64,
    depreciation_period: u32,
    annual_depreciation: f64,
    /// NPV discount rate as a fraction.
    pub discount_rate: f64,
}

impl CashFlowModel {
    /// Derives the financing structure for `capacity_kw` producing
    /// `base_generation_kwh` in year one.
    pub fn new(capacity_kw: f64, base_generation_kwh: f64, cfg: &EconomicConfig) -> Self {
        let gross_cost = capacity_kw * cfg.installation_cost_per_kw;
        let construction_cost = gross_cost - gross_cost * cfg.itc_percent / 100.0;
        let equity_ratio = cfg.equity_percent / 100.0;
        let equity = construction_cost * equity_ratio;
        let loan_amount = construction_cost * (1.0 - equity_ratio);
        let annual_depreciation = if cfg.depreciation_period > 0 {
            construction_cost / f64::from(cfg.depreciation_period)
        } else {
            0.0
        };

        Self {
            base_generation_kwh,
            construction_cost,
            equity,
            loan_amount,
            revenue: RevenueModel::from_config(cfg),
            base_operating_cost: capacity_kw
                * (cfg.maintenance_cost_per_kw + cfg.lease_cost_per_kw),
            inflation: cfg.inflation_rate / 100.0,
            degradation: cfg.annual_degradation / 100.0,
            loan_rate_pct: cfg.loan_interest_rate,
            loan_term: cfg.loan_term,
            grace_period: cfg.loan_grace_period,
            tax_rate: cfg.corporate_tax_rate / 100.0,
            depreciation_period: cfg.depreciation_period,
            annual_depreciation,
            discount_rate: discount_rate_pct(cfg.discount_rate, cfg.loan_interest_rate) / 100.0,
        }
    }

    pub fn investment(&self) -> Investment {
        Investment {
            construction_cost: self.construction_cost,
            equity: self.equity,
            discount_rate: self.discount_rate,
        }
    }

    /// Runs the yearly loop with all price terms scaled by `price_factor`.
    ///
    /// Years are produced strictly in order since each depends on the
    /// previous loan balance and cumulative cash flow.
    pub fn run(&self, price_factor: f64) -> Vec<YearlyPrediction> {
        let mut loan = Loan::new(
            self.loan_amount,
            self.loan_rate_pct,
            self.loan_term,
            self.grace_period,
        );
        let mut cumulative = -self.equity;
        let mut yearly = Vec::with_capacity(ANALYSIS_YEARS as usize);

        for year in 1..=ANALYSIS_YEARS {
            let efficiency = 1.0 - self.degradation * f64::from(year - 1);
            let generation = self.base_generation_kwh * efficiency;
            let gross_revenue = self.revenue.revenue(year, generation, price_factor);
            let operating_cost =
                self.base_operating_cost * (1.0 + self.inflation).powf(f64::from(year - 1));
            let debt = loan.service(year);

            let depreciation = if year <= self.depreciation_period {
                self.annual_depreciation
            } else {
                0.0
            };
            let taxable_income =
                (gross_revenue - operating_cost - debt.interest - depreciation).max(0.0);
            let corporate_tax = taxable_income * self.tax_rate;
            let net_revenue =
                gross_revenue - operating_cost - debt.interest - debt.principal - corporate_tax;
            cumulative += net_revenue;

            yearly.push(YearlyPrediction {
                year,
                efficiency_rate: efficiency * 100.0,
                annual_generation: generation,
                monthly_avg_generation: generation / 12.0,
                gross_revenue,
                maintenance_cost: operating_cost,
                loan_payment: debt.payment,
                interest_payment: debt.interest,
                principal_payment: debt.principal,
                remaining_principal: debt.remaining,
                depreciation,
                taxable_income,
                corporate_tax,
                net_revenue,
                cumulative_cash_flow: cumulative,
            });
        }
        yearly
    }
}

/// Runs the economic simulation for a plant of `capacity_kw` DC capacity.
///
/// # Arguments
///
/// * `capacity_kw` - Installed DC capacity from the array design
/// * `dc_ac_ratio` - DC/AC ratio of the design, carried into the result
/// * `cfg` - Economic parameters, with weather records for the hourly mode
///
/// # Returns
///
/// The complete `SimulationResult`. Never fails: missing inputs degrade to
/// fallbacks or zeros.
pub fn compute_economics(capacity_kw: f64, dc_ac_ratio: f64, cfg: &EconomicConfig) -> SimulationResult {
    compute_economics_with_storage(capacity_kw, dc_ac_ratio, cfg, &BessConfig::default())
}

/// Same as [`compute_economics`], additionally reporting battery storage.
pub fn compute_economics_with_storage(
    capacity_kw: f64,
    dc_ac_ratio: f64,
    cfg: &EconomicConfig,
    bess: &BessConfig,
) -> SimulationResult {
    let profile = estimate_generation(capacity_kw, cfg);

    let waterfall = loss_waterfall(&cfg.loss_factors);
    let waterfall_final_pr = waterfall_pr(&cfg.loss_factors);
    if (waterfall_final_pr - cfg.system_efficiency).abs() > PR_MISMATCH_WARN_POINTS {
        tracing::warn!(
            declared_pr = cfg.system_efficiency,
            waterfall_pr = waterfall_final_pr,
            "declared system efficiency differs from the loss waterfall; yield uses the declared value"
        );
    }

    let model = CashFlowModel::new(capacity_kw, profile.annual_kwh, cfg);
    let yearly = model.run(1.0);
    let kpis = KpiReport::from_yearly(&yearly, &model.investment());

    let total_gross_revenue = yearly.iter().map(|y| y.gross_revenue).sum();
    let total_maintenance_cost = yearly.iter().map(|y| y.maintenance_cost).sum();
    let total_loan_interest = yearly.iter().map(|y| y.interest_payment).sum();
    let total_tax = yearly.iter().map(|y| y.corporate_tax).sum();
    let environmental_impact =
        EnvironmentalImpact::from_annual_mwh(kpis.total_generation_mwh / f64::from(ANALYSIS_YEARS));

    tracing::debug!(
        annual_kwh = profile.annual_kwh,
        roi = kpis.roi,
        npv = kpis.npv,
        "economic simulation complete"
    );

    SimulationResult {
        capacity_kw,
        dc_ac_ratio,
        generation_mode: profile.mode,
        kpis,
        total_gross_revenue,
        total_construction_cost: model.construction_cost,
        equity_amount: model.equity,
        loan_amount: model.loan_amount,
        total_maintenance_cost,
        total_loan_interest,
        total_tax,
        clipping_loss_pct: cfg.clipping_loss,
        iam_loss_pct: cfg.loss_factors.iam,
        monthly_generation: profile.monthly_kwh,
        monthly_avg_insolation: profile.monthly_avg_insolation,
        hourly_generation: profile.hourly_kwh,
        environmental_impact,
        sensitivity: sensitivity::analyze(&model),
        loss_waterfall: waterfall,
        waterfall_final_pr,
        bess: simulate_bess(&profile.hourly_kwh, bess),
        yearly,
    }
}
