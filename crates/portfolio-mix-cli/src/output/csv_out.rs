use serde_json::Value;
use std::io::{self, Write};

use super::{chart_rows, eprint_warnings, flatten, result_of, scalar, CHART_HEADERS};

/// Write output as CSV to stdout, with any warnings on stderr.
///
/// A frontier becomes one row per point; anything else becomes
/// `field,value` pairs with nested fields flattened.
pub fn print_csv(value: &Value) {
    eprint_warnings(value);
    let stdout = io::stdout();
    if let Err(e) = write_csv(value, stdout.lock()) {
        eprintln!("CSV write error: {}", e);
    }
}

/// Write CSV rows, stopping at the first write error.
pub fn write_csv<W: Write>(value: &Value, out: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    let result = result_of(value);

    if let Some(rows) = chart_rows(result) {
        wtr.write_record(CHART_HEADERS)?;
        for row in rows {
            wtr.write_record(&row)?;
        }
    } else if let Value::Object(map) = result {
        wtr.write_record(["field", "value"])?;
        for (key, val) in flatten(map) {
            wtr.write_record([key, scalar(&val)])?;
        }
    } else {
        wtr.write_record([scalar(result)])?;
    }

    wtr.flush()?;
    Ok(())
}
