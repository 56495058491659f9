use common::errors::AppError;
use common::models::Quote;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

const QUOTE_KEY: &str = "Global Quote";

/// Upstream "Global Quote" record; every value arrives as a string.
#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "02. open")]
    open: String,
    #[serde(rename = "03. high")]
    high: String,
    #[serde(rename = "04. low")]
    low: String,
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "06. volume")]
    volume: String,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: String,
    #[serde(rename = "08. previous close")]
    previous_close: String,
    #[serde(rename = "09. change")]
    change: String,
    #[serde(rename = "10. change percent")]
    change_percent: String,
}

pub fn reshape(symbol: &str, data: &Value) -> Result<Quote, AppError> {
    let raw = match data.get(QUOTE_KEY) {
        Some(raw) if !is_empty(raw) => raw,
        _ => return Err(not_found()),
    };

    let quote = GlobalQuote::deserialize(raw).map_err(processing)?;

    Ok(Quote {
        symbol: symbol.to_uppercase(),
        price: float("05. price", &quote.price)?,
        open: float("02. open", &quote.open)?,
        high: float("03. high", &quote.high)?,
        low: float("04. low", &quote.low)?,
        volume: coerce("06. volume", &quote.volume, "integer")?,
        latest_trading_day: quote.latest_trading_day,
        previous_close: float("08. previous close", &quote.previous_close)?,
        change: float("09. change", &quote.change)?,
        change_percent: quote.change_percent,
    })
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Number(_) => false,
    }
}

fn not_found() -> AppError {
    AppError::not_found("Global quote data not found. Try again later or check your symbol.")
}

fn processing(cause: impl std::fmt::Display) -> AppError {
    AppError::processing(format!("Error processing quote data: {}", cause))
}

fn float(key: &str, raw: &str) -> Result<f64, AppError> {
    let value: f64 = coerce(key, raw, "float")?;
    if !value.is_finite() {
        return Err(processing(format!("'{}' is not finite: '{}'", key, raw)));
    }
    Ok(value)
}

fn coerce<T: FromStr>(key: &str, raw: &str, kind: &str) -> Result<T, AppError> {
    raw.trim().parse().map_err(|_| {
        processing(format!(
            "could not convert '{}' value '{}' to {}",
            key, raw, kind
        ))
    })
}
