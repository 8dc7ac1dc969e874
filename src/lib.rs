//! Utility-scale PV plant designer: string sizing, electrical safety checks,
//! generation estimates, and a 20-year financial model.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Array sizing, voltage corrections, cable losses, and safety predicates.
pub mod design;
pub mod equipment;
pub mod io;
pub mod pipeline;
/// Generation, losses, cash flow, KPIs, sensitivity, and environmental impact.
pub mod sim;
pub mod weather;
