/// Battery storage attached to the plant.
pub mod bess;
pub mod cashflow;
pub mod environment;
/// Generation profiles for the flat, monthly, and hourly modes.
pub mod generation;
pub mod kpi;
pub mod loan;
/// Loss waterfall and performance ratio.
pub mod losses;
pub mod sensitivity;
pub mod types;

pub use cashflow::{compute_economics, compute_economics_with_storage};
