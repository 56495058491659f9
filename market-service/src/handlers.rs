use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use common::errors::AppError;
use common::models::{HealthResponse, IntradayResponse, MessageResponse, Quote};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::api_client::{AlphaVantageClient, UpstreamQuery};
use crate::config::Config;
use crate::{intraday, quote};

const DEFAULT_INTRADAY_INTERVAL: &str = "1min";
const GDP_INTERVALS: [&str; 2] = ["annual", "quarterly"];

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<AlphaVantageClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = AlphaVantageClient::new(config.base_url.clone(), config.api_key.clone());
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
        }
    }
}

#[derive(Deserialize)]
pub struct IntervalQuery {
    pub interval: Option<String>,
}

#[derive(Deserialize)]
pub struct CurrencyPairQuery {
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
}

#[derive(Deserialize)]
pub struct FxPairQuery {
    pub from_symbol: Option<String>,
    pub to_symbol: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, AppError> {
    value.ok_or(AppError::MissingParameter(name))
}

async fn forward(state: &AppState, query: UpstreamQuery) -> Result<Json<Value>, AppError> {
    let body = state.client.call(query).await?;
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Alpha Vantage Stock API - Use /intraday/{symbol}?interval=1min or /quote/{symbol}".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "API is running smoothly.".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/intraday/{symbol}",
    params(
        ("symbol" = String, Path, description = "Ticker symbol"),
        ("interval" = Option<String>, Query, description = "Bar interval, one of the configured intervals (default 1min)")
    ),
    responses(
        (status = 200, description = "Latest bars and series statistics", body = IntradayResponse),
        (status = 400, description = "Invalid interval"),
        (status = 404, description = "No intraday series in the upstream response"),
        (status = 500, description = "Upstream failure or unparseable series")
    ),
    tag = "stocks"
)]
pub async fn intraday(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<IntervalQuery>,
) -> Result<Json<IntradayResponse>, AppError> {
    let interval = params
        .interval
        .unwrap_or_else(|| DEFAULT_INTRADAY_INTERVAL.to_string());
    info!(symbol = %symbol, interval = %interval, "Intraday request received");

    if !state.config.is_valid_interval(&interval) {
        return Err(AppError::invalid_interval(state.config.valid_intervals.as_slice()));
    }

    let query = UpstreamQuery::function("TIME_SERIES_INTRADAY")
        .param("symbol", symbol.as_str())
        .param("interval", interval.as_str())
        .param("outputsize", "compact");
    let data = state.client.call(query).await?;

    let response = intraday::reshape(&symbol, &interval, &data)?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/quote/{symbol}",
    params(
        ("symbol" = String, Path, description = "Ticker symbol")
    ),
    responses(
        (status = 200, description = "Latest quote", body = Quote),
        (status = 404, description = "No quote in the upstream response"),
        (status = 500, description = "Upstream failure or malformed quote")
    ),
    tag = "stocks"
)]
pub async fn global_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>, AppError> {
    info!(symbol = %symbol, "Quote request received");

    let data = state
        .client
        .call(UpstreamQuery::function("GLOBAL_QUOTE").param("symbol", symbol.as_str()))
        .await?;

    let quote = quote::reshape(&symbol, &data)?;
    Ok(Json(quote))
}

#[utoipa::path(
    get,
    path = "/monthly-adjusted/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses(
        (status = 200, description = "Upstream monthly adjusted series, unmodified"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "stocks"
)]
pub async fn monthly_adjusted(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, AppError> {
    info!(symbol = %symbol, "Monthly adjusted request received");
    forward(
        &state,
        UpstreamQuery::function("TIME_SERIES_MONTHLY_ADJUSTED").param("symbol", symbol),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/weekly/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses(
        (status = 200, description = "Upstream weekly series, unmodified"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "stocks"
)]
pub async fn weekly(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, AppError> {
    info!(symbol = %symbol, "Weekly request received");
    forward(
        &state,
        UpstreamQuery::function("TIME_SERIES_WEEKLY").param("symbol", symbol),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/daily/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses(
        (status = 200, description = "Upstream daily series, unmodified"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "stocks"
)]
pub async fn daily(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, AppError> {
    info!(symbol = %symbol, "Daily request received");
    forward(
        &state,
        UpstreamQuery::function("TIME_SERIES_DAILY").param("symbol", symbol),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/news-sentiment/{tickers}",
    params(("tickers" = String, Path, description = "Comma-separated tickers")),
    responses(
        (status = 200, description = "Upstream news sentiment feed, unmodified"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "news"
)]
pub async fn news_sentiment(
    State(state): State<AppState>,
    Path(tickers): Path<String>,
) -> Result<Json<Value>, AppError> {
    info!(tickers = %tickers, "News sentiment request received");
    forward(
        &state,
        UpstreamQuery::function("NEWS_SENTIMENT").param("tickers", tickers),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/top-gainers-losers",
    responses(
        (status = 200, description = "Upstream market movers, unmodified"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "stocks"
)]
pub async fn top_gainers_losers(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    info!("Top gainers/losers request received");
    forward(&state, UpstreamQuery::function("TOP_GAINERS_LOSERS")).await
}

#[utoipa::path(
    get,
    path = "/currency-exchange-rate",
    params(
        ("from_currency" = String, Query, description = "Source currency code"),
        ("to_currency" = String, Query, description = "Target currency code")
    ),
    responses(
        (status = 200, description = "Upstream exchange rate, unmodified"),
        (status = 400, description = "Missing currency parameter"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "forex"
)]
pub async fn currency_exchange_rate(
    State(state): State<AppState>,
    Query(params): Query<CurrencyPairQuery>,
) -> Result<Json<Value>, AppError> {
    let from_currency = required(params.from_currency, "from_currency")?;
    let to_currency = required(params.to_currency, "to_currency")?;
    info!(from = %from_currency, to = %to_currency, "Exchange rate request received");

    forward(
        &state,
        UpstreamQuery::function("CURRENCY_EXCHANGE_RATE")
            .param("from_currency", from_currency)
            .param("to_currency", to_currency),
    )
    .await
}

async fn fx_series(
    state: &AppState,
    function: &str,
    params: FxPairQuery,
) -> Result<Json<Value>, AppError> {
    let from_symbol = required(params.from_symbol, "from_symbol")?;
    let to_symbol = required(params.to_symbol, "to_symbol")?;
    info!(function, from = %from_symbol, to = %to_symbol, "FX request received");

    forward(
        state,
        UpstreamQuery::function(function)
            .param("from_symbol", from_symbol)
            .param("to_symbol", to_symbol),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/fx-daily",
    params(
        ("from_symbol" = String, Query, description = "Source currency code"),
        ("to_symbol" = String, Query, description = "Target currency code")
    ),
    responses(
        (status = 200, description = "Upstream daily FX series, unmodified"),
        (status = 400, description = "Missing currency parameter"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "forex"
)]
pub async fn fx_daily(
    State(state): State<AppState>,
    Query(params): Query<FxPairQuery>,
) -> Result<Json<Value>, AppError> {
    fx_series(&state, "FX_DAILY", params).await
}

#[utoipa::path(
    get,
    path = "/fx-weekly",
    params(
        ("from_symbol" = String, Query, description = "Source currency code"),
        ("to_symbol" = String, Query, description = "Target currency code")
    ),
    responses(
        (status = 200, description = "Upstream weekly FX series, unmodified"),
        (status = 400, description = "Missing currency parameter"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "forex"
)]
pub async fn fx_weekly(
    State(state): State<AppState>,
    Query(params): Query<FxPairQuery>,
) -> Result<Json<Value>, AppError> {
    fx_series(&state, "FX_WEEKLY", params).await
}

#[utoipa::path(
    get,
    path = "/fx-monthly",
    params(
        ("from_symbol" = String, Query, description = "Source currency code"),
        ("to_symbol" = String, Query, description = "Target currency code")
    ),
    responses(
        (status = 200, description = "Upstream monthly FX series, unmodified"),
        (status = 400, description = "Missing currency parameter"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "forex"
)]
pub async fn fx_monthly(
    State(state): State<AppState>,
    Query(params): Query<FxPairQuery>,
) -> Result<Json<Value>, AppError> {
    fx_series(&state, "FX_MONTHLY", params).await
}

#[utoipa::path(
    get,
    path = "/real-gdp",
    params(
        ("interval" = Option<String>, Query, description = "annual (default) or quarterly")
    ),
    responses(
        (status = 200, description = "Upstream real GDP series, unmodified"),
        (status = 400, description = "Invalid interval"),
        (status = 500, description = "Upstream failure")
    ),
    tag = "economy"
)]
pub async fn real_gdp(
    State(state): State<AppState>,
    Query(params): Query<IntervalQuery>,
) -> Result<Json<Value>, AppError> {
    let interval = params.interval.unwrap_or_else(|| GDP_INTERVALS[0].to_string());
    info!(interval = %interval, "Real GDP request received");

    if !GDP_INTERVALS.contains(&interval.as_str()) {
        return Err(AppError::invalid_interval(&GDP_INTERVALS[..]));
    }

    forward(
        &state,
        UpstreamQuery::function("REAL_GDP").param("interval", interval),
    )
    .await
}
