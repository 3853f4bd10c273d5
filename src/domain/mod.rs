//! Domain types for commission calculation.
//!
//! This module provides:
//! - Exact numeric handling via the Decimal wrapper
//! - Primitives: CalculationId, CalculationStatus
//! - Insurer rate configuration
//! - Calculation records and aggregate statistics

pub mod calculation;
pub mod decimal;
pub mod primitives;
pub mod rate;
pub mod stats;

pub use calculation::CommissionCalculation;
pub use decimal::Decimal;
pub use primitives::{CalculationId, CalculationStatus};
pub use rate::RateConfig;
pub use stats::{CommissionStats, GlobalStats, GroupStats};
