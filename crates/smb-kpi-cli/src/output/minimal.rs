use serde_json::Value;

use super::cell;

/// Print just the headline answer.
///
/// KPI reports print the overall status and health score, formatting
/// commands print the formatted string, lists print one line per entry.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(summary) = result.get("summary") {
        let status = summary.get("overall_status").map(cell).unwrap_or_default();
        match summary.get("health_score").filter(|v| !v.is_null()) {
            Some(score) => println!("{} ({})", status, cell(score)),
            None => println!("{}", status),
        }
        return;
    }

    if let Some(formatted) = result.get("formatted") {
        println!("{}", cell(formatted));
        return;
    }

    match result {
        Value::Array(items) if items.is_empty() => println!("none"),
        Value::Array(items) => {
            for item in items {
                let line = ["message", "id"]
                    .iter()
                    .find_map(|k| item.get(*k))
                    .unwrap_or(item);
                println!("{}", cell(line));
            }
        }
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, cell(val));
            }
        }
        other => println!("{}", cell(other)),
    }
}
