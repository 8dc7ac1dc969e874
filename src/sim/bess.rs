//! Battery storage charged from midday surplus.

use serde::{Deserialize, Serialize};

use super::types::ANALYSIS_YEARS;

/// Hours of the average day during which the battery charges.
const CHARGE_HOURS: std::ops::RangeInclusive<usize> = 10..=16;
/// Peak-shaving value of discharged energy (currency/kWh).
const PEAK_SHAVING_PER_KWH: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BessConfig {
    pub enabled: bool,
    pub capacity_kwh: f64,
    /// Charge power limit (kW).
    pub power_kw: f64,
    /// Round-trip efficiency (%).
    pub efficiency: f64,
    /// Usable depth of discharge (%).
    pub dod: f64,
    pub cost_per_kwh: f64,
    pub cycles_per_year: u32,
}

impl Default for BessConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity_kwh: 0.0,
            power_kw: 0.0,
            efficiency: 90.0,
            dod: 90.0,
            cost_per_kwh: 500_000.0,
            cycles_per_year: 350,
        }
    }
}

impl BessConfig {
    /// Returns `true` if the battery takes part in the simulation.
    pub fn is_active(&self) -> bool {
        self.enabled && self.capacity_kwh > 0.0
    }
}

/// Storage figures over the analysis horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BessResult {
    pub stored_energy_mwh: f64,
    pub discharged_energy_mwh: f64,
    /// Discharged energy relative to daily generation (%).
    pub self_consumption_increase_pct: f64,
    pub peak_shaving_benefit: f64,
    pub capex: f64,
}

/// Simulates one daily cycle on the average-day profile and scales it to
/// the horizon.
///
/// Returns `None` if the battery is disabled or has no capacity.
pub fn simulate_bess(hourly_kwh: &[f64; 24], cfg: &BessConfig) -> Option<BessResult> {
    if !cfg.is_active() {
        return None;
    }

    let usable_kwh = cfg.capacity_kwh * cfg.dod / 100.0;
    let charged: f64 = hourly_kwh[CHARGE_HOURS]
        .iter()
        .map(|g| g.min(cfg.power_kw))
        .sum();
    let daily_stored = charged.min(usable_kwh);
    let daily_discharged = daily_stored * cfg.efficiency / 100.0;

    let days = 365.0 * f64::from(ANALYSIS_YEARS);
    let daily_total: f64 = hourly_kwh.iter().sum();
    let self_consumption_increase_pct = if daily_total > 0.0 {
        daily_discharged / daily_total * 100.0
    } else {
        0.0
    };

    Some(BessResult {
        stored_energy_mwh: daily_stored * days / 1000.0,
        discharged_energy_mwh: daily_discharged * days / 1000.0,
        self_consumption_increase_pct,
        peak_shaving_benefit: daily_discharged * days * PEAK_SHAVING_PER_KWH,
        capex: cfg.capacity_kwh * cfg.cost_per_kwh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midday_profile(kwh: f64) -> [f64; 24] {
        let mut p = [0.0; 24];
        for v in &mut p[8..=17] {
            *v = kwh;
        }
        p
    }

    #[test]
    fn disabled_battery_yields_nothing() {
        assert!(simulate_bess(&midday_profile(50.0), &BessConfig::default()).is_none());
        let no_capacity = BessConfig {
            enabled: true,
            ..BessConfig::default()
        };
        assert!(simulate_bess(&midday_profile(50.0), &no_capacity).is_none());
    }

    #[test]
    fn charge_limited_by_power_rating() {
        let cfg = BessConfig {
            enabled: true,
            capacity_kwh: 1000.0,
            power_kw: 20.0,
            ..BessConfig::default()
        };
        let r = simulate_bess(&midday_profile(50.0), &cfg);
        // 7 charging hours * 20 kW = 140 kWh/day
        let r = r.unwrap_or_default();
        assert!((r.stored_energy_mwh - 140.0 * 365.0 * 20.0 / 1000.0).abs() < 1e-9);
        assert!((r.discharged_energy_mwh - 126.0 * 365.0 * 20.0 / 1000.0).abs() < 1e-9);
        assert!((r.self_consumption_increase_pct - 126.0 / 500.0 * 100.0).abs() < 1e-9);
        assert!((r.capex - 500_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn charge_limited_by_usable_capacity() {
        let cfg = BessConfig {
            enabled: true,
            capacity_kwh: 100.0,
            power_kw: 100.0,
            ..BessConfig::default()
        };
        let r = simulate_bess(&midday_profile(50.0), &cfg).unwrap_or_default();
        // 90 % DoD of 100 kWh
        assert!((r.stored_energy_mwh - 90.0 * 7.3).abs() < 1e-9);
        assert!((r.peak_shaving_benefit - 81.0 * 7300.0 * 100.0).abs() < 1e-6);
    }
}
