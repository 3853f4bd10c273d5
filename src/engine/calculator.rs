//! Commission calculation for a single contract.

use super::{RateRegistry, DISCOUNT_FACTOR, MONTHS_PER_YEAR};
use crate::domain::{CalculationId, CalculationStatus, CommissionCalculation, Decimal};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

/// Why a calculation produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotApplicableReason {
    #[error("insurer name is empty")]
    EmptyInsurer,
    #[error("monthly premium must be positive, got {0}")]
    NonPositivePremium(Decimal),
    #[error("no active rate config for insurer {0}")]
    UnknownInsurer(String),
    #[error("internal fault: {0}")]
    InternalFault(String),
}

/// Tagged result of a calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationOutcome {
    Success(CommissionCalculation),
    NotApplicable(NotApplicableReason),
}

impl CalculationOutcome {
    /// Collapse to the public contract: a record, or nothing.
    pub fn into_option(self) -> Option<CommissionCalculation> {
        match self {
            CalculationOutcome::Success(calc) => Some(calc),
            CalculationOutcome::NotApplicable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&NotApplicableReason> {
        match self {
            CalculationOutcome::Success(_) => None,
            CalculationOutcome::NotApplicable(reason) => Some(reason),
        }
    }
}

struct Amounts {
    effective_rate: Decimal,
    first_year: Decimal,
    recurring: Decimal,
}

/// Computes commissions against an injected rate registry.
///
/// Cheap to clone; the registry is shared read-only.
#[derive(Debug, Clone)]
pub struct CommissionEngine {
    registry: Arc<RateRegistry>,
}

impl CommissionEngine {
    pub fn new(registry: Arc<RateRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RateRegistry {
        &self.registry
    }

    /// Project first-year and recurring commission for a contract.
    ///
    /// Returns `None` for empty insurer names, non-positive premiums, unknown
    /// insurers and internal arithmetic faults alike. Use [`Self::evaluate`]
    /// to find out which.
    pub fn calculate(
        &self,
        insurer: &str,
        monthly_premium: Decimal,
        salesperson: Option<&str>,
    ) -> Option<CommissionCalculation> {
        self.evaluate(insurer, monthly_premium, salesperson)
            .into_option()
    }

    /// Same as [`Self::calculate`], keeping the reason when no record is produced.
    ///
    /// When a salesperson is given, their rate replaces the insurer's
    /// first-year rate even if they have no override on record (the default
    /// fallback rate then applies). An empty name counts as no salesperson.
    /// The recurring rate always comes from the insurer.
    pub fn evaluate(
        &self,
        insurer: &str,
        monthly_premium: Decimal,
        salesperson: Option<&str>,
    ) -> CalculationOutcome {
        let salesperson = salesperson.filter(|name| !name.is_empty());
        if insurer.is_empty() {
            return not_applicable(NotApplicableReason::EmptyInsurer);
        }
        if !monthly_premium.is_positive() {
            return not_applicable(NotApplicableReason::NonPositivePremium(monthly_premium));
        }

        let Some(config) = self.registry.lookup_insurer_config(insurer) else {
            return not_applicable(NotApplicableReason::UnknownInsurer(insurer.to_string()));
        };

        let first_year_rate = match salesperson {
            Some(name) => self.registry.lookup_salesperson_rate(name),
            None => config.first_year_rate,
        };

        let amounts = match compute_amounts(monthly_premium, first_year_rate, config.recurring_rate)
        {
            Some(amounts) => amounts,
            None => {
                let reason = NotApplicableReason::InternalFault(format!(
                    "arithmetic overflow for premium {}",
                    monthly_premium
                ));
                error!(insurer, premium = %monthly_premium, "Commission calculation failed: {}", reason);
                return CalculationOutcome::NotApplicable(reason);
            }
        };

        CalculationOutcome::Success(CommissionCalculation {
            id: CalculationId::generate(),
            project_id: None,
            insurer: insurer.to_string(),
            monthly_premium,
            salesperson: salesperson.map(str::to_string),
            first_year_commission: amounts.first_year,
            recurring_commission: amounts.recurring,
            effective_rate: amounts.effective_rate,
            created_at: Utc::now(),
            status: CalculationStatus::Success,
            message: None,
        })
    }
}

fn not_applicable(reason: NotApplicableReason) -> CalculationOutcome {
    warn!(%reason, "Commission not applicable");
    CalculationOutcome::NotApplicable(reason)
}

/// `premium × rate × 0.875 × 12`, for both rates. `None` on overflow.
fn compute_amounts(
    monthly_premium: Decimal,
    first_year_rate: Decimal,
    recurring_rate: Decimal,
) -> Option<Amounts> {
    let annualize = |rate: Decimal| {
        monthly_premium
            .checked_mul(rate)?
            .checked_mul(DISCOUNT_FACTOR)?
            .checked_mul(Decimal::from(MONTHS_PER_YEAR))
    };

    Some(Amounts {
        effective_rate: first_year_rate,
        first_year: annualize(first_year_rate)?,
        recurring: annualize(recurring_rate)?,
    })
}
