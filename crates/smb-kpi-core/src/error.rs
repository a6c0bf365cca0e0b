use thiserror::Error;

/// Errors raised at the edges of the engine (input parsing, configuration).
///
/// KPI-level data problems are never errors; they are encoded as
/// [`crate::kpi::KpiStatus::Unavailable`] on the affected result.
#[derive(Debug, Error)]
pub enum KpiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid configuration: {field} — {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for KpiError {
    fn from(e: serde_json::Error) -> Self {
        KpiError::SerializationError(e.to_string())
    }
}
