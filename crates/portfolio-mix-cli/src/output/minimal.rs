use serde_json::Value;

use super::{eprint_warnings, result_of, scalar};

/// Print just the key answer from the output.
///
/// For a frontier this is the highlighted minimum-variance label; otherwise
/// the first well-known field present, then the first field. Warnings go
/// to stderr so stdout stays a single value.
pub fn print_minimal(value: &Value) {
    eprint_warnings(value);
    let result_obj = result_of(value);

    if let Some(label) = result_obj
        .pointer("/chart/highlight/label")
        .and_then(|v| v.as_str())
    {
        println!("{}", label);
        return;
    }

    let priority_keys = ["label", "min_variance_label", "correlation"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", scalar(val));
                    return;
                }
            }
        }
        if let Some(pair) = map.get("pair").and_then(|p| p.get("correlation")) {
            println!("correlation: {}", scalar(pair));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar(val));
            return;
        }
    }

    println!("{}", scalar(result_obj));
}
