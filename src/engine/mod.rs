//! Pure computation engine for commission projections.
//!
//! Nothing in here performs I/O or holds mutable state; the registry is
//! built once and shared read-only.

use crate::domain::Decimal;

pub mod aggregate;
pub mod calculator;
pub mod format;
pub mod registry;

pub use aggregate::{aggregate, breakdown};
pub use calculator::{CalculationOutcome, CommissionEngine, NotApplicableReason};
pub use format::{format_currency, is_valid_premium};
pub use registry::{RateRegistry, RegistryError};

// ============================================================================
// Policy constants
// ============================================================================

/// Multiplier applied to `premium × rate` before annualizing (87.5%).
pub const DISCOUNT_FACTOR: Decimal = Decimal::from_scaled(875, 3);

/// First-year rate for a salesperson with no negotiated override (3%).
pub const DEFAULT_SALESPERSON_RATE: Decimal = Decimal::from_scaled(3, 2);

/// Highest monthly premium accepted by `is_valid_premium`.
pub const MAX_MONTHLY_PREMIUM: Decimal = Decimal::from_scaled(10_000, 0);

pub const MONTHS_PER_YEAR: i64 = 12;
