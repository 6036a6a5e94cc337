//! Input/output helpers for the calculator.

/// CSV export for monthly flows and amortization tables.
pub mod export;
