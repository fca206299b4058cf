use chrono::NaiveDate;
use portfolio_mix_core::market_data::{within_window, LookbackWindow, PriceSource, StaticPriceSource};
use portfolio_mix_core::{PortfolioMixError, PortfolioMixResult, Price, PriceBar, PriceSeries};
use rust_decimal::Decimal;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

use super::file;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn parse_price(value: &Value) -> CliResult<Price> {
    let price = match value {
        Value::String(s) => s.trim().parse::<Decimal>()?,
        Value::Number(n) => match n.to_string().parse::<Decimal>() {
            Ok(d) => d,
            Err(_) => {
                let f = n.as_f64().ok_or("price is not a finite number")?;
                Decimal::try_from(f)?
            }
        },
        other => return Err(format!("Expected a price, got {other}").into()),
    };
    if price <= Decimal::ZERO {
        return Err(format!("Close prices must be positive, got {price}").into());
    }
    Ok(price)
}

fn parse_date(value: &Value) -> CliResult<NaiveDate> {
    let raw = value.as_str().ok_or("date must be a string")?;
    // Accept full ISO timestamps by keeping only the calendar date
    let day = raw.get(..10).unwrap_or(raw);
    Ok(NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{raw}': {e}"))?)
}

fn parse_bar(value: &Value) -> CliResult<PriceBar> {
    match value {
        Value::Object(map) => {
            let close = map
                .get("close")
                .ok_or("price bar object must contain a 'close' field")?;
            let date = match map.get("date") {
                Some(Value::Null) | None => None,
                Some(d) => Some(parse_date(d)?),
            };
            Ok(PriceBar {
                date,
                close: parse_price(close)?,
            })
        }
        other => Ok(PriceBar {
            date: None,
            close: parse_price(other)?,
        }),
    }
}

/// Parse a JSON array of closes: bare numbers/strings or `{"date", "close"}` objects.
pub fn parse_bars(value: &Value) -> CliResult<Vec<PriceBar>> {
    let arr = value
        .as_array()
        .ok_or("Expected a JSON array of prices or price bars")?;
    arr.iter().map(parse_bar).collect()
}

/// Parse CSV with a header containing `close` and optionally `date`.
pub fn parse_csv_bars<R: Read>(reader: R) -> CliResult<Vec<PriceBar>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let close_idx = position("close").ok_or("CSV must have a 'close' column")?;
    let date_idx = position("date");

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let close = record.get(close_idx).ok_or("missing close value")?;
        let date = match date_idx.and_then(|i| record.get(i)) {
            Some(d) if !d.trim().is_empty() => {
                Some(parse_date(&Value::String(d.trim().to_string()))?)
            }
            _ => None,
        };
        bars.push(PriceBar {
            date,
            close: parse_price(&Value::String(close.to_string()))?,
        });
    }
    Ok(bars)
}

/// Build an in-memory source from `{"TICKER": [prices...], ...}`.
pub fn source_from_json(value: &Value) -> CliResult<StaticPriceSource> {
    let map = value
        .as_object()
        .ok_or("Expected a JSON object mapping ticker to price array")?;
    let mut source = StaticPriceSource::new();
    for (ticker, prices) in map {
        let bars =
            parse_bars(prices).map_err(|e| format!("Invalid prices for '{ticker}': {e}"))?;
        source.insert(PriceSeries::new(ticker.clone(), bars));
    }
    Ok(source)
}

/// Source from inline comma-separated closes for exactly two tickers.
pub fn source_from_inline(
    ticker_a: &str,
    prices_a: &[Decimal],
    ticker_b: &str,
    prices_b: &[Decimal],
) -> StaticPriceSource {
    StaticPriceSource::new()
        .with_series(PriceSeries::from_closes(ticker_a, prices_a))
        .with_series(PriceSeries::from_closes(ticker_b, prices_b))
}

/// Reads `<dir>/<TICKER>.json` or `<dir>/<TICKER>.csv`.
#[derive(Debug, Clone)]
pub struct FilePriceSource {
    dir: PathBuf,
}

impl FilePriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FilePriceSource { dir: dir.into() }
    }

    fn candidates(&self, ticker: &str) -> Vec<PathBuf> {
        let mut names = vec![ticker.to_string()];
        if ticker.to_uppercase() != ticker {
            names.push(ticker.to_uppercase());
        }
        names
            .iter()
            .flat_map(|name| {
                ["json", "csv"]
                    .into_iter()
                    .map(move |ext| self.dir.join(format!("{name}.{ext}")))
            })
            .collect()
    }

    fn load(&self, ticker: &str) -> CliResult<Vec<PriceBar>> {
        let path = self
            .candidates(ticker)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| {
                format!(
                    "No price file for '{}' in {} (expected {}.json or {}.csv)",
                    ticker,
                    self.dir.display(),
                    ticker,
                    ticker
                )
            })?;
        debug!(ticker, path = %path.display(), "loading price file");

        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => parse_csv_bars(file::read_text(&path)?.as_bytes()),
            _ => parse_bars(&file::read_json_value(&path)?),
        }
    }
}

impl PriceSource for FilePriceSource {
    fn close_prices(
        &self,
        ticker: &str,
        window: &LookbackWindow,
    ) -> PortfolioMixResult<PriceSeries> {
        let bars = self
            .load(ticker)
            .map_err(|e| PortfolioMixError::DataSource(e.to_string()))?;
        Ok(PriceSeries::new(ticker, within_window(bars, window)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_bare_prices() {
        let bars = parse_bars(&json!([100, "101.5", 99.25])).unwrap();
        let closes: Vec<_> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![dec!(100), dec!(101.5), dec!(99.25)]);
        assert!(bars.iter().all(|b| b.date.is_none()));
    }

    #[test]
    fn test_parse_dated_bars() {
        let bars = parse_bars(&json!([
            {"date": "2024-01-02T00:00:00.000Z", "close": 100.1},
            {"date": "2024-01-03", "close": "101"}
        ]))
        .unwrap();
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(bars[1].close, dec!(101));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(parse_bars(&json!([100, 0])).is_err());
        assert!(parse_bars(&json!([100, -3])).is_err());
    }

    #[test]
    fn test_parse_csv() {
        let data = "Date,Open,Close\n2024-01-02,1,10.5\n2024-01-03,1,10.7\n";
        let bars = parse_csv_bars(data.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, dec!(10.7));
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn test_parse_csv_requires_close() {
        let data = "date,price\n2024-01-02,10\n";
        assert!(parse_csv_bars(data.as_bytes()).is_err());
    }

    #[test]
    fn test_source_from_json() {
        let source = source_from_json(&json!({"VTSAX": [1, 2, 3], "VBTLX": [4, 5]})).unwrap();
        let window = LookbackWindow::ending(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 6)
            .unwrap();
        assert_eq!(source.close_prices("VTSAX", &window).unwrap().len(), 3);
        assert_eq!(source.close_prices("vbtlx", &window).unwrap().len(), 2);
    }

    #[test]
    fn test_file_source_resolves_and_filters() {
        let dir = std::env::temp_dir().join(format!("pmix-prices-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("VTSAX.json"),
            json!([
                {"date": "2023-10-02", "close": 90},
                {"date": "2024-01-02", "close": 100},
                {"date": "2024-03-01", "close": "104.5"}
            ])
            .to_string(),
        )
        .unwrap();
        // json takes precedence over csv for the same ticker
        std::fs::write(dir.join("VTSAX.csv"), "date,close\n2024-01-02,1\n").unwrap();
        std::fs::write(
            dir.join("VBTLX.csv"),
            "Date,Close\n2024-02-01,10.2\n2024-01-02,10.1\n2024-07-01,11\n",
        )
        .unwrap();

        let source = FilePriceSource::new(&dir);
        let window = LookbackWindow::ending(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 6)
            .unwrap();

        let stocks = source.close_prices("vtsax", &window).unwrap();
        let bonds = source.close_prices("VBTLX", &window).unwrap();
        let missing = source.close_prices("NOPE", &window);
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(stocks.closes(), vec![dec!(100), dec!(104.5)]);
        assert_eq!(bonds.closes(), vec![dec!(10.1), dec!(10.2)]);
        match missing {
            Err(PortfolioMixError::DataSource(msg)) => assert!(msg.contains("No price file for 'NOPE'")),
            other => panic!("expected DataSource error, got {other:?}"),
        }
    }
}
