use serde_json::Value;

use smb_kpi_core::kpi::kpi_catalog;

/// Every KPI definition, in report order.
pub fn run_catalog() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(kpi_catalog())?)
}
