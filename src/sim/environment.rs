//! Environmental equivalents of the generated energy.

use serde::Serialize;

/// Grid emission factor (tCO₂/MWh).
pub const CO2_T_PER_MWH: f64 = 0.4594;
/// Annual CO₂ uptake of one pine tree (t).
pub const CO2_T_PER_PINE_TREE: f64 = 0.0066;
/// Oil displaced per MWh (TOE/MWh).
pub const TOE_PER_MWH: f64 = 0.215;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnvironmentalImpact {
    /// Annual CO₂ reduction (t).
    pub co2_reduction_t: f64,
    /// Pine trees absorbing the same CO₂ per year.
    pub pine_trees: f64,
    /// Annual oil substitution (TOE).
    pub oil_substitution_toe: f64,
}

impl EnvironmentalImpact {
    /// Converts mean annual generation (MWh) into environmental equivalents.
    pub fn from_annual_mwh(annual_mwh: f64) -> Self {
        let co2_reduction_t = annual_mwh * CO2_T_PER_MWH;
        Self {
            co2_reduction_t,
            pine_trees: co2_reduction_t / CO2_T_PER_PINE_TREE,
            oil_substitution_toe: annual_mwh * TOE_PER_MWH,
        }
    }
}
