//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::config::ProjectConfig;
use crate::design::{ArrayDesign, ArrayConfiguration, InverterGroup, SafetyCheck, StringVoltages};
use crate::sim::environment::EnvironmentalImpact;
use crate::sim::generation::GenerationMode;
use crate::sim::kpi::KpiReport;
use crate::sim::losses::LossStep;
use crate::sim::types::{SensitivityResult, SimulationResult};

/// Engineering side of the project.
#[derive(Debug, Serialize)]
pub struct DesignResponse {
    pub array: ArrayConfiguration,
    pub inverter_count: u32,
    pub dc_ac_ratio: f64,
    pub bifacial_gain_pct: f64,
    pub string_voltages: StringVoltages,
    pub safety: SafetyCheck,
    /// `true` only if all six safety predicates hold.
    pub safety_passed: bool,
    pub safety_failures: Vec<&'static str>,
    pub inverter_groups: Vec<InverterGroup>,
}

impl From<&ArrayDesign> for DesignResponse {
    fn from(d: &ArrayDesign) -> Self {
        Self {
            array: d.array,
            inverter_count: d.inverter_count,
            dc_ac_ratio: d.dc_ac_ratio,
            bifacial_gain_pct: d.bifacial_gain_pct,
            string_voltages: d.string_voltages,
            safety: d.safety,
            safety_passed: d.safety.passed(),
            safety_failures: d.safety.failures(),
            inverter_groups: d.inverter_groups.clone(),
        }
    }
}

/// Economic summary without the yearly records.
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub generation_mode: GenerationMode,
    pub capacity_kw: f64,
    pub total_construction_cost: f64,
    pub equity_amount: f64,
    pub loan_amount: f64,
    pub kpi: KpiReport,
    pub monthly_generation: [f64; 12],
    pub environmental_impact: EnvironmentalImpact,
    pub sensitivity: Vec<SensitivityResult>,
    pub loss_waterfall: Vec<LossStep>,
    /// Analysis inputs the summary was computed from.
    pub config: ProjectConfig,
}

impl SimulationResponse {
    pub fn new(sim: &SimulationResult, config: &ProjectConfig) -> Self {
        Self {
            generation_mode: sim.generation_mode,
            capacity_kw: sim.capacity_kw,
            total_construction_cost: sim.total_construction_cost,
            equity_amount: sim.equity_amount,
            loan_amount: sim.loan_amount,
            kpi: sim.kpis,
            monthly_generation: sim.monthly_generation,
            environmental_impact: sim.environmental_impact,
            sensitivity: sim.sensitivity.clone(),
            loss_waterfall: sim.loss_waterfall.clone(),
            config: config.clone(),
        }
    }
}

/// Optional range query parameters for the yearly endpoint.
#[derive(Debug, Deserialize)]
pub struct YearlyQuery {
    /// First year (inclusive).
    pub from: Option<u32>,
    /// Last year (inclusive).
    pub to: Option<u32>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
