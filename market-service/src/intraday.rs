use chrono::{NaiveDate, NaiveDateTime};
use common::errors::AppError;
use common::models::{FieldStatistics, IntradayResponse, LatestData, OhlcvValues, SeriesStatistics};
use serde_json::{Map, Value};
use thiserror::Error;

/// Rows echoed back in `latest_data`.
pub const LATEST_ROWS: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FIELDS: [(&str, &str); 5] = [
    ("1. open", "open"),
    ("2. high", "high"),
    ("3. low", "low"),
    ("4. close", "close"),
    ("5. volume", "volume"),
];

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("duplicate timestamp {0}")]
    DuplicateTimestamp(NaiveDateTime),

    #[error("row {0} is not an object")]
    NotAnObject(String),

    #[error("row {timestamp}: missing field '{field}'")]
    MissingField {
        timestamp: String,
        field: &'static str,
    },

    #[error("row {timestamp}: could not convert {value} in '{field}' to float")]
    NotANumber {
        timestamp: String,
        field: &'static str,
        value: String,
    },

    #[error("row {timestamp}: '{field}' is not finite")]
    NonFinite {
        timestamp: String,
        field: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntradayBar {
    pub timestamp: NaiveDateTime,
    pub values: OhlcvValues,
}

/// Turn the upstream intraday payload into the reshaped response.
///
/// A missing or empty `"Time Series (<interval>)"` mapping is reported as not
/// found; anything unparseable inside it fails the whole request.
pub fn reshape(symbol: &str, interval: &str, data: &Value) -> Result<IntradayResponse, AppError> {
    let key = format!("Time Series ({})", interval);
    let raw = match data.get(&key) {
        None => return Err(not_found()),
        Some(Value::Object(rows)) if rows.is_empty() => return Err(not_found()),
        Some(Value::Object(rows)) => rows,
        Some(_) => {
            return Err(AppError::processing(format!(
                "Error parsing data: '{}' is not an object",
                key
            )));
        }
    };

    let series =
        parse_series(raw).map_err(|e| AppError::processing(format!("Error parsing data: {}", e)))?;

    Ok(IntradayResponse {
        symbol: symbol.to_uppercase(),
        interval: interval.to_string(),
        latest_data: latest(&series),
        statistics: summarize(&series),
    })
}

fn not_found() -> AppError {
    AppError::not_found(
        "Intraday data not found. Try again later or check your symbol/interval.",
    )
}

/// Parse every row and sort newest first.
pub fn parse_series(raw: &Map<String, Value>) -> Result<Vec<IntradayBar>, SeriesError> {
    let mut series = raw
        .iter()
        .map(|(timestamp, row)| parse_row(timestamp, row))
        .collect::<Result<Vec<_>, _>>()?;

    series.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(pair) = series
        .windows(2)
        .find(|pair| pair[0].timestamp == pair[1].timestamp)
    {
        return Err(SeriesError::DuplicateTimestamp(pair[0].timestamp));
    }
    Ok(series)
}

fn parse_row(timestamp: &str, row: &Value) -> Result<IntradayBar, SeriesError> {
    let parsed_at = parse_timestamp(timestamp)?;
    let row = row
        .as_object()
        .ok_or_else(|| SeriesError::NotAnObject(timestamp.to_string()))?;

    let mut numbers = [0.0; 5];
    for (slot, (upstream_key, field)) in numbers.iter_mut().zip(FIELDS) {
        let value = row.get(upstream_key).ok_or_else(|| SeriesError::MissingField {
            timestamp: timestamp.to_string(),
            field,
        })?;
        *slot = parse_number(timestamp, field, value)?;
    }

    let [open, high, low, close, volume] = numbers;
    Ok(IntradayBar {
        timestamp: parsed_at,
        values: OhlcvValues {
            open,
            high,
            low,
            close,
            volume,
        },
    })
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, SeriesError> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| SeriesError::Timestamp(raw.to_string()))
}

fn parse_number(timestamp: &str, field: &'static str, value: &Value) -> Result<f64, SeriesError> {
    let number = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .ok_or_else(|| SeriesError::NotANumber {
        timestamp: timestamp.to_string(),
        field,
        value: value.to_string(),
    })?;

    if !number.is_finite() {
        return Err(SeriesError::NonFinite {
            timestamp: timestamp.to_string(),
            field,
        });
    }
    Ok(number)
}

fn latest(series: &[IntradayBar]) -> LatestData {
    LatestData(
        series
            .iter()
            .take(LATEST_ROWS)
            .map(|bar| (bar.timestamp.format(TIMESTAMP_FORMAT).to_string(), bar.values))
            .collect(),
    )
}

/// Column statistics over the full series. `series` must not be empty.
pub fn summarize(series: &[IntradayBar]) -> SeriesStatistics {
    let column = |pick: fn(&OhlcvValues) -> f64| {
        let values: Vec<f64> = series.iter().map(|bar| pick(&bar.values)).collect();
        describe(&values)
    };

    SeriesStatistics {
        open: column(|v| v.open),
        high: column(|v| v.high),
        low: column(|v| v.low),
        close: column(|v| v.close),
        volume: column(|v| v.volume),
    }
}

/// count, mean, sample std, min, quartiles and max of a non-empty column.
pub fn describe(values: &[f64]) -> FieldStatistics {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (squares / (count - 1) as f64).sqrt()
    });

    FieldStatistics {
        count,
        mean,
        std,
        min: sorted[0],
        p25: quantile(&sorted, 0.25),
        p50: quantile(&sorted, 0.5),
        p75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

// linear interpolation between closest ranks
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bar(open: &str) -> Value {
        json!({
            "1. open": open,
            "2. high": "10.5",
            "3. low": "9.5",
            "4. close": "10.1",
            "5. volume": "1200"
        })
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_matches_sample_statistics() {
        let stats = describe(&[4.0, 1.0, 3.0, 2.0]);

        assert_eq!(stats.count, 4);
        assert!(approx(stats.mean, 2.5));
        assert!(approx(stats.std.unwrap(), (5.0f64 / 3.0).sqrt()));
        assert_eq!(stats.min, 1.0);
        assert!(approx(stats.p25, 1.75));
        assert!(approx(stats.p50, 2.5));
        assert!(approx(stats.p75, 3.25));
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn describe_single_value_has_no_std() {
        let stats = describe(&[7.0]);

        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, None);
        assert_eq!(stats.p25, 7.0);
        assert_eq!(stats.p75, 7.0);
    }

    #[test]
    fn series_sorted_newest_first() {
        let raw = json!({
            "2024-03-01 09:35:00": bar("2"),
            "2024-03-01 09:45:00": bar("4"),
            "2024-03-01 09:30:00": bar("1"),
            "2024-03-01 09:40:00": bar("3"),
        });

        let series = parse_series(raw.as_object().unwrap()).unwrap();
        let opens: Vec<f64> = series.iter().map(|b| b.values.open).collect();
        assert_eq!(opens, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn accepts_date_only_and_iso_keys() {
        assert!(parse_timestamp("2024-03-01").is_ok());
        assert!(parse_timestamp("2024-03-01T09:30:00").is_ok());
        assert_eq!(
            parse_timestamp("yesterday"),
            Err(SeriesError::Timestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn rejects_keys_resolving_to_same_timestamp() {
        let raw = json!({
            "2024-03-01": bar("1"),
            "2024-03-01 00:00:00": bar("2"),
        });

        let err = parse_series(raw.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, SeriesError::DuplicateTimestamp(_)));
    }

    #[test]
    fn rejects_unparseable_value() {
        let raw = json!({ "2024-03-01 09:30:00": bar("abc") });

        let err = parse_series(raw.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, SeriesError::NotANumber { field: "open", .. }));
    }

    #[test]
    fn rejects_non_finite_value() {
        let raw = json!({ "2024-03-01 09:30:00": bar("NaN") });

        let err = parse_series(raw.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, SeriesError::NonFinite { field: "open", .. }));
    }

    #[test]
    fn rejects_missing_field() {
        let raw = json!({ "2024-03-01 09:30:00": { "1. open": "1.0" } });

        let err = parse_series(raw.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, SeriesError::MissingField { field: "high", .. }));
    }

    #[test]
    fn reshape_reports_missing_series_as_not_found() {
        let data = json!({ "Note": "Thank you for using Alpha Vantage!" });

        let err = reshape("ibm", "5min", &data).unwrap_err();
        assert!(matches!(err, AppError::DataNotFound(_)));
    }

    #[test]
    fn reshape_reports_empty_series_as_not_found() {
        let data = json!({ "Time Series (5min)": {} });

        let err = reshape("ibm", "5min", &data).unwrap_err();
        assert!(matches!(err, AppError::DataNotFound(_)));
    }

    #[test]
    fn reshape_parse_failure_is_processing_error() {
        let data = json!({ "Time Series (1min)": { "not a date": bar("1") } });

        match reshape("ibm", "1min", &data) {
            Err(AppError::Processing(message)) => {
                assert!(message.starts_with("Error parsing data:"));
                assert!(message.contains("not a date"));
            }
            other => panic!("expected processing error, got {:?}", other),
        }
    }

    #[test]
    fn reshape_keeps_five_and_summarizes_all() {
        let rows: Map<String, Value> = (0..8)
            .map(|minute| {
                (
                    format!("2024-03-01 10:{:02}:00", minute),
                    bar(&format!("{}.0", minute + 1)),
                )
            })
            .collect();
        let data = json!({ "Time Series (1min)": rows });

        let response = reshape("ibm", "1min", &data).unwrap();

        assert_eq!(response.symbol, "IBM");
        assert_eq!(response.latest_data.0.len(), LATEST_ROWS);
        assert_eq!(response.latest_data.0[0].0, "2024-03-01 10:07:00");
        assert_eq!(response.latest_data.0[4].0, "2024-03-01 10:03:00");
        assert_eq!(response.statistics.open.count, 8);
        assert_eq!(response.statistics.open.min, 1.0);
        assert_eq!(response.statistics.open.max, 8.0);
    }
}
