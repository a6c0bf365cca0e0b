use clap::Args;
use serde_json::{json, Value};

use smb_kpi_core::format::{self, FormatOptions, Locale, NegativeStyle};
use smb_kpi_core::statements::parse_amount;
use smb_kpi_core::types::Currency;

use crate::input;

/// Arguments for currency formatting
#[derive(Args)]
pub struct FormatCurrencyArgs {
    /// Amount to format, e.g. 1234567.89 or "-1,500"
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// ISO 4217 currency code
    #[arg(long)]
    pub currency: Option<String>,

    /// Locale: en-us, en-gb, de-de or fr-fr
    #[arg(long)]
    pub locale: Option<String>,

    /// Write negative amounts in parentheses
    #[arg(long)]
    pub parentheses: bool,

    /// Override the currency's minor-unit digits
    #[arg(long)]
    pub decimals: Option<u32>,

    /// Path to a JSON or YAML configuration file whose `format` section is the base
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for percentage formatting
#[derive(Args)]
pub struct FormatPercentageArgs {
    /// Fraction to format (0.0625 is 6.3%)
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Locale: en-us, en-gb, de-de or fr-fr
    #[arg(long)]
    pub locale: Option<String>,

    /// Digits after the decimal point
    #[arg(long)]
    pub decimals: Option<u32>,

    /// Path to a JSON or YAML configuration file whose `format` section is the base
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run_format_currency(args: FormatCurrencyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amount = parse_amount(&Value::String(args.amount.clone()))
        .ok_or_else(|| format!("'{}' is not a number", args.amount))?;

    let mut options = base_options(args.config.as_deref())?;
    if let Some(code) = args.currency {
        options.currency = Currency::from_code(&code);
    }
    if let Some(locale) = args.locale {
        options.locale = locale.parse::<Locale>()?;
    }
    if args.parentheses {
        options.negative_style = NegativeStyle::Parentheses;
    }
    if args.decimals.is_some() {
        options.currency_decimals = args.decimals;
    }

    Ok(json!({
        "input": amount.to_string(),
        "formatted": format::format_currency(amount, &options),
    }))
}

pub fn run_format_percentage(
    args: FormatPercentageArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let value = parse_amount(&Value::String(args.value.clone()))
        .ok_or_else(|| format!("'{}' is not a number", args.value))?;

    let mut options = base_options(args.config.as_deref())?;
    if let Some(locale) = args.locale {
        options.locale = locale.parse::<Locale>()?;
    }
    if let Some(decimals) = args.decimals {
        options.percent_decimals = decimals;
    }

    Ok(json!({
        "input": value.to_string(),
        "formatted": format::try_format_percentage(value, &options)?,
    }))
}

fn base_options(config: Option<&str>) -> Result<FormatOptions, Box<dyn std::error::Error>> {
    match config {
        Some(path) => {
            let config: smb_kpi_core::KpiConfig = input::file::read_config(path)?;
            config.validate()?;
            Ok(config.format)
        }
        None => Ok(FormatOptions::default()),
    }
}
