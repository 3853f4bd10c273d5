//! Insurer commission-rate configuration.

use crate::domain::Decimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Commission rates negotiated with one insurer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateConfig {
    /// Stable key, e.g. `spvie`.
    pub insurer_id: String,
    /// Display name, matched case-insensitively against caller input.
    pub insurer_name: String,
    /// Fraction of the premium paid during the contract's first year.
    pub first_year_rate: Decimal,
    /// Fraction of the premium paid on renewal years.
    pub recurring_rate: Decimal,
    /// Inactive configs are invisible to lookups and listings.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    /// Informational premium thresholds; never enforced by the calculator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_premium: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_premium: Option<Decimal>,
}

impl RateConfig {
    /// Create an active config with no premium thresholds.
    pub fn new(
        insurer_id: impl Into<String>,
        insurer_name: impl Into<String>,
        first_year_rate: Decimal,
        recurring_rate: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        RateConfig {
            insurer_id: insurer_id.into(),
            insurer_name: insurer_name.into(),
            first_year_rate,
            recurring_rate,
            active: true,
            created_at,
            min_premium: None,
            max_premium: None,
        }
    }

    /// Same config, marked inactive.
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Case-insensitive comparison against the display name.
    ///
    /// Uses full Unicode lowercasing so `néoliane` matches `NÉOLIANE`.
    pub fn matches_name(&self, name: &str) -> bool {
        self.insurer_name.to_lowercase() == name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str) -> RateConfig {
        RateConfig::new(
            "id",
            name,
            Decimal::from_scaled(30, 2),
            Decimal::from_scaled(15, 2),
            Utc::now(),
        )
    }

    #[test]
    fn test_matches_name_ignores_case() {
        let c = config("SPVIE");
        assert!(c.matches_name("spvie"));
        assert!(c.matches_name("SpViE"));
        assert!(!c.matches_name("spvie "));
        assert!(!c.matches_name("april"));
    }

    #[test]
    fn test_matches_name_lowercases_accents() {
        assert!(config("NÉOLIANE").matches_name("néoliane"));
    }

    #[test]
    fn test_deactivated() {
        let c = config("APRIL").deactivated();
        assert!(!c.active);
    }

    #[test]
    fn test_serialization_omits_missing_thresholds() {
        let json = serde_json::to_value(config("APRIL")).unwrap();
        assert_eq!(json["insurerName"], "APRIL");
        assert!(json.get("minPremium").is_none());
        assert!(json["firstYearRate"].is_number());
    }
}
