//! In-memory calculation store for tests and ephemeral runs.

use super::{CalculationFilter, CalculationStore, StoreError};
use crate::domain::{CalculationId, CalculationStatus, CommissionCalculation};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Calculation store backed by a vector; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<CommissionCalculation>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with records.
    pub fn with_records(records: Vec<CommissionCalculation>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl CalculationStore for MemoryStore {
    async fn insert(&self, calculation: &CommissionCalculation) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == calculation.id) {
            return Err(StoreError::Duplicate(calculation.id.to_string()));
        }
        records.push(calculation.clone());
        Ok(())
    }

    async fn get(&self, id: &CalculationId) -> Result<Option<CommissionCalculation>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| &r.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &CalculationFilter,
    ) -> Result<Vec<CommissionCalculation>, StoreError> {
        let records = self.records.read().await;
        let mut matching: Vec<CommissionCalculation> =
            records.iter().filter(|r| filter.matches(r)).cloned().collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn update_status(
        &self,
        id: &CalculationId,
        status: CalculationStatus,
        message: Option<String>,
    ) -> Result<CommissionCalculation, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.status = status;
        record.message = message;
        Ok(record.clone())
    }

    async fn delete(&self, id: &CalculationId) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
