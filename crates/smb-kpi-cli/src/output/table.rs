use colored::{Color, Colorize};
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use smb_kpi_core::format::{format_kpi_value, status_color, FormatOptions};
use smb_kpi_core::kpi::{KpiCalculationResult, KpiStatus};

use super::{cell, kpi_rows};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(kpis) = kpi_rows(value) {
        println!("{}", kpi_table(kpis, &report_format(value)));
        print_footer(value);
        return;
    }
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                if let Some(Value::Object(kpis)) = result.get("kpis") {
                    print_trend_table(kpis);
                } else {
                    print_fields(result);
                }
                print_footer(value);
            }
            _ => print_fields(map),
        },
        Value::Array(arr) => print_array_table(arr),
        other => println!("{}", other),
    }
}

/// Format options the report was produced with, echoed in its assumptions.
fn report_format(envelope: &Value) -> FormatOptions {
    envelope
        .get("assumptions")
        .and_then(|a| a.get("format"))
        .and_then(|f| serde_json::from_value(f.clone()).ok())
        .unwrap_or_default()
}

fn kpi_table(kpis: &Map<String, Value>, options: &FormatOptions) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["KPI", "Value", "Status", "Calculation"]);
    for (id, raw) in kpis {
        let Ok(kpi) = serde_json::from_value::<KpiCalculationResult>(raw.clone()) else {
            builder.push_record([id.clone(), cell(raw), String::new(), String::new()]);
            continue;
        };
        builder.push_record([
            kpi.name.clone(),
            format_kpi_value(&kpi, options),
            paint_status(kpi.status),
            kpi.calculation.clone(),
        ]);
    }
    Table::from(builder)
}

fn print_trend_table(kpis: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Series", "Direction", "Change", "Growth", "Improving"]);
    for (id, trend) in kpis {
        let field = |k: &str| trend.get(k).map(cell).unwrap_or_default();
        builder.push_record([
            id.clone(),
            field("direction"),
            field("change"),
            field("growth_rate"),
            field("improving"),
        ]);
    }
    println!("{}", Table::from(builder));
}

fn paint_status(status: KpiStatus) -> String {
    let label = status.to_string();
    match status {
        KpiStatus::Unavailable => label.dimmed().to_string(),
        _ => label.color(Color::from(status_color(status))).bold().to_string(),
    }
}

fn print_footer(envelope: &Value) {
    if let Some(summary) = envelope.get("result").and_then(|r| r.get("summary")) {
        println!(
            "\nOverall: {}  health score: {}",
            summary.get("overall_status").map(cell).unwrap_or_default(),
            summary.get("health_score").map(cell).unwrap_or_else(|| "-".into())
        );
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow());
            for w in warnings {
                println!("  - {}", cell(w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            println!("(empty)");
        }
        for item in arr {
            println!("{}", cell(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(h.as_str()).map(cell).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use smb_kpi_core::format::Locale;
    use smb_kpi_core::statements::FinancialStatementSnapshot;
    use smb_kpi_core::{calculate_kpis, KpiConfig};

    fn report(config: &KpiConfig) -> Value {
        let json = r#"{
            "period": "2024",
            "balance_sheet": { "current_assets": 500000, "current_liabilities": 200000 }
        }"#;
        let snapshot: FinancialStatementSnapshot = serde_json::from_str(json).unwrap();
        serde_json::to_value(calculate_kpis(&[snapshot], config)).unwrap()
    }

    #[test]
    fn test_table_uses_report_locale() {
        let mut config = KpiConfig::default();
        config.format.locale = Locale::DeDe;
        config.format.multiple_decimals = 1;
        let value = report(&config);

        let options = report_format(&value);
        assert_eq!(options, config.format);

        let kpis = kpi_rows(&value).unwrap();
        let rendered = kpi_table(kpis, &options).to_string();
        assert!(rendered.contains("2,5x"), "{rendered}");
        assert!(!rendered.contains("2.50x"));
    }

    #[test]
    fn test_missing_format_falls_back_to_default() {
        let value = serde_json::json!({ "result": {}, "assumptions": {} });
        assert_eq!(report_format(&value), FormatOptions::default());
    }
}
