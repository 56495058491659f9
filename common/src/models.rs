use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

/// Static welcome payload for `/`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Liveness payload for `/health`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Flattened "Global Quote" record
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: i64,
    pub latest_trading_day: String,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: String,
}

/// One OHLCV row of an intraday series
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, ToSchema)]
pub struct OhlcvValues {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Most recent rows keyed by timestamp, serialized as a JSON object that keeps
/// the row order (newest first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestData(pub Vec<(String, OhlcvValues)>);

impl Serialize for LatestData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (timestamp, values) in &self.0 {
            map.serialize_entry(timestamp, values)?;
        }
        map.end()
    }
}

/// Descriptive statistics for one column
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, ToSchema)]
pub struct FieldStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `null` with fewer than two rows.
    pub std: Option<f64>,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub p50: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

/// Per-column statistics across the whole intraday series
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, ToSchema)]
pub struct SeriesStatistics {
    pub open: FieldStatistics,
    pub high: FieldStatistics,
    pub low: FieldStatistics,
    pub close: FieldStatistics,
    pub volume: FieldStatistics,
}

/// Reshaped intraday response
#[derive(Debug, Serialize, ToSchema)]
pub struct IntradayResponse {
    pub symbol: String,
    pub interval: String,
    /// Five most recent rows, newest first
    #[schema(value_type = Object)]
    pub latest_data: LatestData,
    pub statistics: SeriesStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(v: f64) -> OhlcvValues {
        OhlcvValues {
            open: v,
            high: v,
            low: v,
            close: v,
            volume: v,
        }
    }

    #[test]
    fn latest_data_keeps_row_order() {
        let data = LatestData(vec![
            ("2024-01-02 10:00:00".to_string(), row(2.0)),
            ("2024-01-01 10:00:00".to_string(), row(1.0)),
        ]);

        let text = serde_json::to_string(&data).unwrap();
        let newer = text.find("2024-01-02").unwrap();
        let older = text.find("2024-01-01").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn statistics_use_percent_keys() {
        let stats = FieldStatistics {
            count: 1,
            mean: 1.0,
            std: None,
            min: 1.0,
            p25: 1.0,
            p50: 1.0,
            p75: 1.0,
            max: 1.0,
        };

        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["25%"], 1.0);
        assert_eq!(value["50%"], 1.0);
        assert_eq!(value["75%"], 1.0);
        assert!(value["std"].is_null());
    }
}
