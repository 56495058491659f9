use common::errors::AppError;
use common::http_client::HttpClient;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Query for one upstream call: the function selector followed by
/// operation-specific parameters. The credential is never part of it; the
/// client appends it when the request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamQuery {
    params: Vec<(String, String)>,
}

impl UpstreamQuery {
    pub fn function(name: &str) -> Self {
        Self {
            params: vec![("function".to_string(), name.to_string())],
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }

    pub fn function_name(&self) -> &str {
        &self.params[0].1
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

pub struct AlphaVantageClient {
    http_client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantageClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::default(),
            base_url,
            api_key,
        }
    }

    /// Issue one GET for `query` and return the upstream JSON as-is.
    #[instrument(skip(self, query), fields(function = %query.function_name()))]
    pub async fn call(&self, query: UpstreamQuery) -> Result<Value, AppError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("API_KEY is not configured; refusing upstream call");
            return Err(AppError::UpstreamUnavailable);
        };

        let mut params = query.params;
        params.push(("apikey".to_string(), api_key.to_string()));

        info!("Calling Alpha Vantage");
        self.http_client.get_json(&self.base_url, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    #[test]
    fn query_starts_with_function_selector() {
        let query = UpstreamQuery::function("FX_DAILY")
            .param("from_symbol", "EUR")
            .param("to_symbol", "USD");

        assert_eq!(query.function_name(), "FX_DAILY");
        assert_eq!(query.params().len(), 3);
        assert!(query.params().iter().all(|(name, _)| name != "apikey"));
    }

    #[tokio::test]
    async fn injects_api_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "TIME_SERIES_WEEKLY"))
            .and(query_param("symbol", "IBM"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "weekly": [] })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AlphaVantageClient::new(
            format!("{}/query", mock_server.uri()),
            Some("test-key".to_string()),
        );
        let body = client
            .call(UpstreamQuery::function("TIME_SERIES_WEEKLY").param("symbol", "IBM"))
            .await
            .expect("call should succeed");

        assert_eq!(body, json!({ "weekly": [] }));
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_calling_upstream() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = AlphaVantageClient::new(mock_server.uri(), None);
        let result = client.call(UpstreamQuery::function("TOP_GAINERS_LOSERS")).await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable)));
    }
}
