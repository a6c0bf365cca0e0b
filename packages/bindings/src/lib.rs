use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::Value;

use smb_kpi_core::format::{self, FormatOptions};
use smb_kpi_core::kpi::KpiStatus;
use smb_kpi_core::statements::parse_amount;
use smb_kpi_core::types::Money;
use smb_kpi_core::{KpiConfig, KpiRequest};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_request(input_json: &str) -> NapiResult<KpiRequest> {
    KpiRequest::from_json_str(input_json).map_err(to_napi_error)
}

fn parse_options(options_json: Option<String>) -> NapiResult<FormatOptions> {
    match options_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error),
        None => Ok(FormatOptions::default()),
    }
}

fn parse_number(raw: &str) -> NapiResult<Money> {
    parse_amount(&Value::String(raw.to_string()))
        .ok_or_else(|| to_napi_error(format!("'{raw}' is not a number")))
}

fn parse_status(status: &str) -> NapiResult<KpiStatus> {
    serde_json::from_value(Value::String(status.to_string())).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// `{snapshots, config}` in, KPI report envelope out.
#[napi]
pub fn calculate_kpis(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let output = smb_kpi_core::calculate_kpis(&request.snapshots, &request.config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_trends(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let output = smb_kpi_core::trend::analyze_trends(&request.snapshots, &request.config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn check_data_quality(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let issues = smb_kpi_core::quality::check_data_quality(
        &request.snapshots,
        request.config.identity_tolerance,
    );
    serde_json::to_string(&issues).map_err(to_napi_error)
}

#[napi]
pub fn kpi_catalog() -> NapiResult<String> {
    serde_json::to_string(smb_kpi_core::kpi::kpi_catalog()).map_err(to_napi_error)
}

/// Parse, validate and echo back a configuration with defaults filled in.
#[napi]
pub fn validate_config(config_json: String) -> NapiResult<String> {
    let config = KpiConfig::from_json_str(&config_json).map_err(to_napi_error)?;
    serde_json::to_string(&config).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(amount: String, options_json: Option<String>) -> NapiResult<String> {
    let amount = parse_number(&amount)?;
    let options = parse_options(options_json)?;
    Ok(format::format_currency(amount, &options))
}

#[napi]
pub fn format_percentage(value: String, options_json: Option<String>) -> NapiResult<String> {
    let value = parse_number(&value)?;
    let options = parse_options(options_json)?;
    format::try_format_percentage(value, &options).map_err(to_napi_error)
}

#[napi]
pub fn status_color(status: String) -> NapiResult<String> {
    Ok(format::status_color(parse_status(&status)?).to_string())
}

#[napi]
pub fn status_background(status: String) -> NapiResult<String> {
    Ok(format::status_background(parse_status(&status)?).to_string())
}

#[napi]
pub fn status_label(status: String) -> NapiResult<String> {
    Ok(format::status_label(parse_status(&status)?).to_string())
}
