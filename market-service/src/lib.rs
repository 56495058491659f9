pub mod api_client;
pub mod config;
pub mod handlers;
pub mod intraday;
pub mod openapi;
pub mod quote;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = state.config.cors_layer();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/intraday/{symbol}", get(handlers::intraday))
        .route("/quote/{symbol}", get(handlers::global_quote))
        .route("/monthly-adjusted/{symbol}", get(handlers::monthly_adjusted))
        .route("/weekly/{symbol}", get(handlers::weekly))
        .route("/daily/{symbol}", get(handlers::daily))
        .route("/news-sentiment/{tickers}", get(handlers::news_sentiment))
        .route("/top-gainers-losers", get(handlers::top_gainers_losers))
        .route(
            "/currency-exchange-rate",
            get(handlers::currency_exchange_rate),
        )
        .route("/fx-daily", get(handlers::fx_daily))
        .route("/fx-weekly", get(handlers::fx_weekly))
        .route("/fx-monthly", get(handlers::fx_monthly))
        .route("/real-gdp", get(handlers::real_gdp))
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
