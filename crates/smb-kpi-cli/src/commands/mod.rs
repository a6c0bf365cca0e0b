pub mod analysis;
pub mod catalog;
pub mod format;

use clap::Args;
use serde_json::Value;

use smb_kpi_core::statements::FinancialStatementSnapshot;
use smb_kpi_core::{KpiConfig, KpiRequest};

use crate::input;

/// Where snapshots and configuration come from.
#[derive(Args)]
pub struct SourceArgs {
    /// Path to a JSON request `{snapshots, config}` or a bare array of snapshots
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON or YAML configuration file; replaces any `config` in the request
    #[arg(long)]
    pub config: Option<String>,
}

/// Load a request from `--input` or stdin, apply `--config`, and validate it.
pub fn load_request(
    args: &SourceArgs,
    what: &str,
) -> Result<KpiRequest, Box<dyn std::error::Error>> {
    let raw = if let Some(ref path) = args.input {
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err(format!("--input <file.json> or stdin required for {what}").into());
    };

    let mut request = match raw {
        Value::Array(_) => KpiRequest {
            snapshots: serde_json::from_value::<Vec<FinancialStatementSnapshot>>(raw)?,
            config: KpiConfig::default(),
        },
        other => serde_json::from_value::<KpiRequest>(other)?,
    };

    if let Some(ref path) = args.config {
        request.config = input::file::read_config(path)?;
        tracing::debug!(path = %path, "loaded configuration file");
    }
    request.config.validate()?;
    Ok(request)
}
