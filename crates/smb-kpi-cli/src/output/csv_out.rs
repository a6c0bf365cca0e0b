use serde_json::{Map, Value};
use std::io;

use super::{cell, kpi_rows};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(kpis) = kpi_rows(value) {
        write_kpis(&mut wtr, kpis);
    } else {
        match value {
            Value::Object(map) => match map.get("result") {
                Some(Value::Object(result)) => write_fields(&mut wtr, result),
                Some(Value::Array(rows)) => write_array(&mut wtr, rows),
                _ => write_fields(&mut wtr, map),
            },
            Value::Array(arr) => write_array(&mut wtr, arr),
            other => {
                let _ = wtr.write_record([cell(other)]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_kpis(wtr: &mut StdoutWriter<'_>, kpis: &Map<String, Value>) {
    let columns = ["name", "value", "unit", "status", "reason", "calculation"];
    let mut header = vec!["id"];
    header.extend(columns);
    let _ = wtr.write_record(&header);
    for (id, kpi) in kpis {
        let mut row = vec![id.clone()];
        row.extend(
            columns
                .iter()
                .map(|c| kpi.get(*c).map(cell).unwrap_or_default()),
        );
        let _ = wtr.write_record(&row);
    }
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &cell(val)]);
    }
}

fn write_array(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(*h).map(cell).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
