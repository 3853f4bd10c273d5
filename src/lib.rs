pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod store;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    CalculationId, CalculationStatus, CommissionCalculation, CommissionStats, Decimal, GlobalStats,
    RateConfig,
};
pub use engine::{CalculationOutcome, CommissionEngine, NotApplicableReason, RateRegistry};
pub use error::AppError;
pub use store::{CalculationFilter, CalculationStore, MemoryStore, StoreError};
