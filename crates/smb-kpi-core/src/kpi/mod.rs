//! KPI catalog, classification and calculation.

pub mod calculator;
pub mod catalog;
pub mod status;

pub use calculator::{
    calculate_kpis, run_kpi_request, KpiCalculationResult, KpiReport, KpiRequest, KpiSummary,
};
pub use catalog::{
    definition, kpi_catalog, Computed, KpiCategory, KpiDefinition, KpiId, KpiInputs, KpiUnit,
    KpiValue, CATALOG,
};
pub use status::{Direction, KpiStatus, Thresholds, Unavailable, UnavailableReason};
