use crate::errors::AppError;
use reqwest::{Client, StatusCode};
use tracing::{info, instrument, warn};

/// Single-attempt JSON client for the upstream provider.
///
/// Every failure (transport error, non-200 status, unreadable body) collapses
/// into [`AppError::UpstreamUnavailable`]; the concrete cause is only logged.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// GET `url` with `query` appended as a percent-encoded query string.
    #[instrument(skip(self, query), fields(url = %url))]
    pub async fn get_json<T>(&self, url: &str, query: &[(String, String)]) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(with_query(url, query))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Upstream request failed");
                AppError::UpstreamUnavailable
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = %status, "Upstream returned non-200 status");
            return Err(AppError::UpstreamUnavailable);
        }

        let text = response.text().await.map_err(|e| {
            warn!(error = %e, "Failed to read upstream body");
            AppError::UpstreamUnavailable
        })?;
        let json: T = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Upstream body is not valid JSON");
            AppError::UpstreamUnavailable
        })?;

        info!("Request successful");
        Ok(json)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn with_query(url: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }

    let encoded = query
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, encoded)
}
