use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{
    FieldStatistics, HealthResponse, IntradayResponse, MessageResponse, OhlcvValues, Quote,
    SeriesStatistics,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root,
        handlers::health,
        handlers::intraday,
        handlers::global_quote,
        handlers::monthly_adjusted,
        handlers::weekly,
        handlers::daily,
        handlers::news_sentiment,
        handlers::top_gainers_losers,
        handlers::currency_exchange_rate,
        handlers::fx_daily,
        handlers::fx_weekly,
        handlers::fx_monthly,
        handlers::real_gdp,
    ),
    components(schemas(
        MessageResponse,
        HealthResponse,
        Quote,
        IntradayResponse,
        OhlcvValues,
        FieldStatistics,
        SeriesStatistics,
    )),
    tags(
        (name = "stocks", description = "Equity time series and quotes"),
        (name = "forex", description = "Currency exchange endpoints"),
        (name = "news", description = "News sentiment"),
        (name = "economy", description = "Economic indicators"),
    ),
)]
struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
