pub mod config;
pub mod error;
pub mod format;
pub mod kpi;
pub mod quality;
pub mod statements;
pub mod types;

#[cfg(feature = "trends")]
pub mod trend;

pub use config::KpiConfig;
pub use error::KpiError;
pub use kpi::{calculate_kpis, run_kpi_request, KpiCalculationResult, KpiReport, KpiRequest};
pub use statements::FinancialStatementSnapshot;
pub use types::*;

/// Standard result type for all smb-kpi operations
pub type KpiResult<T> = Result<T, KpiError>;
