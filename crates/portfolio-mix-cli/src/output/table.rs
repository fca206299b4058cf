use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{chart_rows, flatten, scalar, CHART_HEADERS};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_fields(map);
            }
        }
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            if let Some(rows) = chart_rows(result) {
                print_frontier(res_map, rows);
            } else {
                print_fields(res_map);
            }
        }
        other => println!("{}", other),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
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
    for (key, val) in flatten(map) {
        builder.push_record([key, format_value(&val)]);
    }
    println!("{}", Table::from(builder));
}

/// Summary of the analysis, then one row per frontier point.
fn print_frontier(result: &Map<String, Value>, rows: Vec<[String; 3]>) {
    if let Some(title) = result
        .get("chart")
        .and_then(|c| c.get("title"))
        .and_then(|t| t.as_str())
    {
        println!("{}\n", title);
    }

    let mut summary = Builder::default();
    summary.push_record(["Field", "Value"]);
    for key in ["window", "analysis"] {
        if let Some(Value::Object(section)) = result.get(key) {
            for (name, val) in flatten(section) {
                if name == "frontier" {
                    continue;
                }
                summary.push_record([format!("{key}.{name}"), format_value(&val)]);
            }
        }
    }
    println!("{}\n", Table::from(summary));

    let mut points = Builder::default();
    points.push_record(CHART_HEADERS);
    for row in rows {
        points.push_record(row);
    }
    println!("{}", Table::from(points));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        other => scalar(other),
    }
}
