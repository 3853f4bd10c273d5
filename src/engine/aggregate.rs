//! Summary statistics over calculation records.

use super::MONTHS_PER_YEAR;
use crate::domain::{CommissionCalculation, CommissionStats, Decimal, GlobalStats, GroupStats};
use std::collections::BTreeMap;

/// Totals, count and average first-year commission per contract.
///
/// Every record counts regardless of its status. Order of the input does not
/// matter; an empty slice yields all-zero stats. Totals saturate at the
/// largest representable decimal rather than overflowing.
pub fn aggregate(calculations: &[CommissionCalculation]) -> GlobalStats {
    let total_first_year: Decimal = calculations.iter().map(|c| c.first_year_commission).sum();
    let total_recurring: Decimal = calculations.iter().map(|c| c.recurring_commission).sum();
    let count = calculations.len() as u64;

    GlobalStats {
        total_first_year,
        total_recurring,
        average_per_contract: mean(total_first_year, count),
        count,
    }
}

/// Per-insurer and per-salesperson breakdown, first-year commission per
/// calendar month (`YYYY-MM`, UTC), plus success rate.
pub fn breakdown(calculations: &[CommissionCalculation]) -> CommissionStats {
    let mut by_insurer: BTreeMap<String, GroupAccumulator> = BTreeMap::new();
    let mut by_salesperson: BTreeMap<String, GroupAccumulator> = BTreeMap::new();
    let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut successes = 0u64;

    for calc in calculations {
        by_insurer
            .entry(calc.insurer.clone())
            .or_default()
            .push(calc);
        if let Some(salesperson) = &calc.salesperson {
            by_salesperson
                .entry(salesperson.clone())
                .or_default()
                .push(calc);
        }
        let month = by_month
            .entry(calc.created_at.format("%Y-%m").to_string())
            .or_default();
        *month = month.saturating_add(calc.first_year_commission);
        if calc.is_success() {
            successes += 1;
        }
    }

    let totals = aggregate(calculations);
    let count = totals.count;

    CommissionStats {
        total_monthly_commission: monthly(totals.total_first_year),
        total_annual_commission: totals.total_first_year,
        total_recurring_commission: totals.total_recurring,
        by_insurer: finish_groups(by_insurer),
        by_salesperson: finish_groups(by_salesperson),
        monthly_evolution: by_month,
        success_rate: mean(Decimal::from(successes as i64), count),
        contract_count: count,
        last_updated: calculations.iter().map(|c| c.created_at).max(),
    }
}

#[derive(Default)]
struct GroupAccumulator {
    annual_commission: Decimal,
    rate_sum: Decimal,
    monthly_premium: Decimal,
    count: u64,
}

impl GroupAccumulator {
    fn push(&mut self, calc: &CommissionCalculation) {
        self.annual_commission = self.annual_commission.saturating_add(calc.first_year_commission);
        self.rate_sum = self.rate_sum.saturating_add(calc.effective_rate);
        self.monthly_premium = self.monthly_premium.saturating_add(calc.monthly_premium);
        self.count += 1;
    }

    fn finish(self) -> GroupStats {
        GroupStats {
            monthly_commission: monthly(self.annual_commission),
            annual_commission: self.annual_commission,
            contract_count: self.count,
            average_rate: mean(self.rate_sum, self.count),
            total_monthly_premium: self.monthly_premium,
            total_annual_premium: self
                .monthly_premium
                .saturating_mul(Decimal::from(MONTHS_PER_YEAR)),
        }
    }
}

fn finish_groups(groups: BTreeMap<String, GroupAccumulator>) -> BTreeMap<String, GroupStats> {
    groups
        .into_iter()
        .map(|(key, acc)| (key, acc.finish()))
        .collect()
}

fn mean(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        return Decimal::zero();
    }
    total
        .checked_div(Decimal::from(count as i64))
        .unwrap_or_default()
}

fn monthly(annual: Decimal) -> Decimal {
    annual / Decimal::from(MONTHS_PER_YEAR)
}
