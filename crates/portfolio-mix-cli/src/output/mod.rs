pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` object of an envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Flatten nested objects into dotted keys, leaving arrays intact.
pub(crate) fn flatten(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into("", map, &mut out);
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, out),
            other => out.push((name, other.clone())),
        }
    }
}

/// Warning strings from an envelope's `warnings` array.
pub(crate) fn warnings_of(value: &Value) -> Vec<&str> {
    value
        .get("warnings")
        .and_then(|w| w.as_array())
        .map(|arr| arr.iter().filter_map(|w| w.as_str()).collect())
        .unwrap_or_default()
}

/// Formats without room for warnings send them to stderr.
pub(crate) fn eprint_warnings(value: &Value) {
    for warning in warnings_of(value) {
        eprintln!("warning: {}", warning);
    }
}

pub(crate) const CHART_HEADERS: [&str; 3] =
    ["weight_a_pct", "std_dev_pct", "expected_return_pct"];

/// Frontier rows `(weight, x, y)` when the result carries a chart payload.
pub(crate) fn chart_rows(result: &Value) -> Option<Vec<[String; 3]>> {
    let chart = result.get("chart")?;
    let xs = chart.get("xs")?.as_array()?;
    let ys = chart.get("ys")?.as_array()?;
    Some(
        xs.iter()
            .zip(ys.iter())
            .enumerate()
            .map(|(i, (x, y))| [i.to_string(), scalar(x), scalar(y)])
            .collect(),
    )
}

pub(crate) fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested() {
        let value = json!({"pair": {"correlation": "0.5"}, "observations": 5});
        let flat = flatten(value.as_object().unwrap());
        assert!(flat.contains(&("pair.correlation".to_string(), json!("0.5"))));
        assert!(flat.contains(&("observations".to_string(), json!(5))));
    }

    #[test]
    fn test_chart_rows() {
        let value = json!({"chart": {"xs": ["2.1", "2.2"], "ys": ["4", "4.06"]}});
        let rows = chart_rows(&value).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], ["1".to_string(), "2.2".to_string(), "4.06".to_string()]);
    }

    #[test]
    fn test_warnings_of() {
        let value = json!({"result": {}, "warnings": ["first", "second"]});
        assert_eq!(warnings_of(&value), vec!["first", "second"]);
        assert!(warnings_of(&json!({"result": {}})).is_empty());
    }

    #[test]
    fn test_no_chart() {
        assert!(chart_rows(&json!({"label": "x"})).is_none());
    }
}
