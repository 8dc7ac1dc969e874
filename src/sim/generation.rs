//! Annual, monthly, and hourly generation estimates.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EconomicConfig;
use crate::weather::{IrradianceRecord, has_hourly_coverage};

/// Days per month of a non-leap year.
pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// First and last daylight hour of the synthetic bell-curve profile.
const SUNRISE_HOUR: usize = 6;
const SUNSET_HOUR: usize = 19;

/// Precision of the generation estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// One mean daily insolation value for the whole year.
    #[default]
    #[serde(alias = "basic")]
    Flat,
    /// Twelve monthly mean daily insolation values.
    Monthly,
    /// Hourly TMY irradiance records. `detailed` documents fall back to
    /// monthly values when no records are attached.
    #[serde(alias = "detailed")]
    Hourly,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flat => "flat",
            Self::Monthly => "monthly",
            Self::Hourly => "hourly",
        };
        f.write_str(name)
    }
}

/// Year-one generation profile of the plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationProfile {
    /// Mode actually used, after any fallback.
    pub mode: GenerationMode,
    /// Annual generation (kWh).
    pub annual_kwh: f64,
    /// Generation per calendar month (kWh).
    pub monthly_kwh: [f64; 12],
    /// Generation per hour of an average day (kWh).
    pub hourly_kwh: [f64; 24],
    /// Mean daily insolation per month (h/day).
    pub monthly_avg_insolation: [f64; 12],
}

/// Effective performance ratio: declared system efficiency less clipping.
pub fn performance_ratio(cfg: &EconomicConfig) -> f64 {
    cfg.system_efficiency / 100.0 * (1.0 - cfg.clipping_loss / 100.0)
}

/// Resolves the mode that can actually run with the inputs at hand.
///
/// Hourly mode without enough records falls back to monthly, and monthly
/// mode without twelve values falls back to flat.
pub fn effective_mode(cfg: &EconomicConfig) -> GenerationMode {
    let monthly_ok = cfg.monthly_insolation.len() == 12;
    match cfg.analysis_mode {
        GenerationMode::Hourly if has_hourly_coverage(&cfg.weather) => GenerationMode::Hourly,
        GenerationMode::Hourly | GenerationMode::Monthly => {
            let fallback = if monthly_ok {
                GenerationMode::Monthly
            } else {
                GenerationMode::Flat
            };
            if fallback != cfg.analysis_mode {
                tracing::warn!(
                    requested = %cfg.analysis_mode,
                    used = %fallback,
                    records = cfg.weather.len(),
                    "insufficient inputs for requested generation mode"
                );
            }
            fallback
        }
        GenerationMode::Flat => GenerationMode::Flat,
    }
}

/// Estimates year-one generation for `capacity_kw` of installed DC capacity.
pub fn estimate_generation(capacity_kw: f64, cfg: &EconomicConfig) -> GenerationProfile {
    let pr = performance_ratio(cfg);
    let mode = effective_mode(cfg);
    tracing::debug!(%mode, pr, capacity_kw, "estimating generation");

    match mode {
        GenerationMode::Flat => {
            let daily_kwh = capacity_kw * cfg.daily_insolation * pr;
            let monthly_kwh = DAYS_IN_MONTH.map(|d| daily_kwh * f64::from(d));
            synthetic_profile(mode, monthly_kwh, [cfg.daily_insolation; 12])
        }
        GenerationMode::Monthly => {
            let mut insolation = [0.0; 12];
            insolation.copy_from_slice(&cfg.monthly_insolation[..12]);
            let mut monthly_kwh = [0.0; 12];
            for (m, kwh) in monthly_kwh.iter_mut().enumerate() {
                *kwh = capacity_kw * insolation[m] * f64::from(DAYS_IN_MONTH[m]) * pr;
            }
            synthetic_profile(mode, monthly_kwh, insolation)
        }
        GenerationMode::Hourly => from_records(capacity_kw, pr, &cfg.weather),
    }
}

fn synthetic_profile(
    mode: GenerationMode,
    monthly_kwh: [f64; 12],
    monthly_avg_insolation: [f64; 12],
) -> GenerationProfile {
    let annual_kwh: f64 = monthly_kwh.iter().sum();
    let daily_kwh = annual_kwh / 365.0;
    let weights = bell_weights();
    GenerationProfile {
        mode,
        annual_kwh,
        monthly_kwh,
        hourly_kwh: weights.map(|w| daily_kwh * w),
        monthly_avg_insolation,
    }
}

/// Half-sine weights over the daylight hours, normalized to sum to 1.
fn bell_weights() -> [f64; 24] {
    let span = (SUNSET_HOUR - SUNRISE_HOUR) as f64;
    let mut weights = [0.0; 24];
    for (h, w) in weights
        .iter_mut()
        .enumerate()
        .take(SUNSET_HOUR + 1)
        .skip(SUNRISE_HOUR)
    {
        *w = ((h - SUNRISE_HOUR) as f64 / span * PI).sin();
    }
    let total: f64 = weights.iter().sum();
    weights.map(|w| w / total)
}

fn from_records(capacity_kw: f64, pr: f64, records: &[IrradianceRecord]) -> GenerationProfile {
    let mut monthly_kwh = [0.0; 12];
    let mut monthly_ghi = [0.0; 12];
    let mut hourly_sum = [0.0; 24];
    let mut hourly_count = [0_u32; 24];

    for r in records {
        let Some(m) = (r.month as usize).checked_sub(1).filter(|m| *m < 12) else {
            continue;
        };
        let kwh = capacity_kw * (r.ghi / 1000.0) * pr;
        let h = r.hour as usize % 24;
        monthly_kwh[m] += kwh;
        monthly_ghi[m] += r.ghi;
        hourly_sum[h] += kwh;
        hourly_count[h] += 1;
    }

    let mut hourly_kwh = [0.0; 24];
    for (h, v) in hourly_kwh.iter_mut().enumerate() {
        if hourly_count[h] > 0 {
            *v = hourly_sum[h] / f64::from(hourly_count[h]);
        }
    }
    let mut monthly_avg_insolation = [0.0; 12];
    for (m, v) in monthly_avg_insolation.iter_mut().enumerate() {
        *v = monthly_ghi[m] / 1000.0 / f64::from(DAYS_IN_MONTH[m]);
    }

    GenerationProfile {
        mode: GenerationMode::Hourly,
        annual_kwh: monthly_kwh.iter().sum(),
        monthly_kwh,
        hourly_kwh,
        monthly_avg_insolation,
    }
}
