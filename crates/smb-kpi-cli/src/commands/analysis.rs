use clap::Args;
use serde_json::Value;

use smb_kpi_core::quality::check_data_quality;
use smb_kpi_core::run_kpi_request;
use smb_kpi_core::trend::analyze_trends;

use super::{load_request, SourceArgs};

/// Arguments for the KPI report
#[derive(Args)]
pub struct KpisArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for multi-period trend analysis
#[derive(Args)]
pub struct TrendsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the data-quality check
#[derive(Args)]
pub struct QualityArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run_kpis(args: KpisArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.source, "KPI calculation")?;
    let result = run_kpi_request(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_trends(args: TrendsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.source, "trend analysis")?;
    let result = analyze_trends(&request.snapshots, &request.config);
    Ok(serde_json::to_value(result)?)
}

pub fn run_quality(args: QualityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.source, "data-quality checks")?;
    let issues = check_data_quality(&request.snapshots, request.config.identity_tolerance);
    Ok(serde_json::to_value(issues)?)
}
