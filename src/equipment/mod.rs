//! Datasheet reference data for PV modules and string inverters.

/// String inverter datasheet.
pub mod inverter;
/// PV module datasheet and temperature coefficients.
pub mod module;

pub use inverter::Inverter;
pub use module::{PvModule, TempCoefficients};
