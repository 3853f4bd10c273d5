//! Domain primitives: CalculationId, CalculationStatus.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a commission calculation record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalculationId(pub String);

impl CalculationId {
    /// Wrap an existing identifier.
    pub fn new(id: String) -> Self {
        CalculationId(id)
    }

    /// Generate a fresh identifier. Random (UUID v4), so concurrent callers
    /// never collide.
    pub fn generate() -> Self {
        CalculationId(format!("calc_{}", Uuid::new_v4().simple()))
    }

    /// Get the identifier as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CalculationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome status carried by a calculation record.
///
/// The engine only ever emits `Success`; `Error` and `Pending` are set by
/// callers that track records through their own workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationStatus {
    Success,
    Error,
    Pending,
}

impl CalculationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationStatus::Success => "success",
            CalculationStatus::Error => "error",
            CalculationStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for CalculationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CalculationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(CalculationStatus::Success),
            "error" => Ok(CalculationStatus::Error),
            "pending" => Ok(CalculationStatus::Pending),
            other => Err(format!(
                "status must be success, error, or pending, got {}",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = CalculationId::generate();
        let b = CalculationId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("calc_"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&CalculationStatus::Success).unwrap();
        assert_eq!(json, "\"success\"");

        let pending: CalculationStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(pending, CalculationStatus::Pending);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            CalculationStatus::from_str(" Error ").unwrap(),
            CalculationStatus::Error
        );
        assert!(CalculationStatus::from_str("done").is_err());
    }

    #[test]
    fn test_calculation_id_serializes_as_plain_string() {
        let id = CalculationId::new("calc_1".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"calc_1\"");
        assert_eq!(id.to_string(), "calc_1");
    }
}
