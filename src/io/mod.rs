/// CSV export for yearly and monthly results.
pub mod export;
