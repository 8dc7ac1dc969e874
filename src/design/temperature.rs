//! Temperature correction of module voltages.

/// Reference cell temperature of datasheet values (°C).
pub const STC_TEMP_C: f64 = 25.0;

/// Corrects a datasheet voltage measured at 25 °C to `target_temp_c`.
///
/// `temp_coeff_pct_per_c` is the datasheet coefficient in %/°C. A negative
/// coefficient raises voltage on cold days and lowers it on hot ones.
///
/// # Examples
///
/// ```
/// use pv_designer::design::temperature::corrected_voltage;
///
/// let voc_winter = corrected_voltage(53.68, -0.26, -10.0);
/// assert!((voc_winter - 58.5649).abs() < 1e-3);
/// ```
pub fn corrected_voltage(voltage_at_stc: f64, temp_coeff_pct_per_c: f64, target_temp_c: f64) -> f64 {
    voltage_at_stc * (1.0 + (temp_coeff_pct_per_c / 100.0) * (target_temp_c - STC_TEMP_C))
}
