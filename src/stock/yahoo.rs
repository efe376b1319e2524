use super::provider::{ClosingPrice, MarketDataProvider, QuoteInfo, StockDataError};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;

// Yahoo rejects requests without a browser-looking agent
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Yahoo Finance provider backed by the public v8 chart endpoint.
///
/// The chart `meta` block carries the quote fields, and the daily close
/// series comes from `indicators.quote[0].close`. Unknown symbols are reported
/// as empty data rather than an error.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chart_url(&self, symbol: &str, days: u32) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}d&interval=1d",
            self.base_url, symbol, days
        )
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Option<ChartResult>, StockDataError> {
        let url = self.chart_url(symbol, days);
        log::debug!("Fetching Yahoo chart: {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::REFERER, "https://finance.yahoo.com/")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            log::info!("Yahoo has no chart for {symbol}");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StockDataError::HttpStatus {
                status: status.as_u16(),
                message: format!("chart request for {symbol} failed"),
            });
        }

        parse_chart(&body)
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn quote_info(&self, symbol: &str) -> Result<QuoteInfo, StockDataError> {
        let chart = self.fetch_chart(symbol, 1).await?;
        Ok(chart.map(|c| c.meta).unwrap_or_default())
    }

    async fn close_history(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<ClosingPrice>, StockDataError> {
        let chart = self.fetch_chart(symbol, days).await?;
        Ok(chart.map(|c| c.closing_prices()).unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: QuoteInfo,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<IndicatorQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct IndicatorQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Pair timestamps with closes, skipping sessions without a close.
    fn closing_prices(&self) -> Vec<ClosingPrice> {
        let Some(quote) = self.indicators.quote.first() else {
            return Vec::new();
        };

        self.timestamp
            .iter()
            .zip(quote.close.iter())
            .filter_map(|(&ts, close)| {
                let close = (*close)?;
                let date = DateTime::from_timestamp(ts, 0)?;
                Some(ClosingPrice { date, close })
            })
            .collect()
    }
}

fn parse_chart(body: &str) -> Result<Option<ChartResult>, StockDataError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| StockDataError::ParseError(format!("invalid Yahoo chart payload: {e}")))?;

    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            return Ok(None);
        }
        return Err(StockDataError::ProviderError(format!(
            "{}: {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    Ok(response.chart.result.and_then(|r| r.into_iter().next()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSMC_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "TWD",
                    "symbol": "2330.TW",
                    "regularMarketPrice": 1030.0,
                    "longName": "Taiwan Semiconductor Manufacturing Company Limited"
                },
                "timestamp": [1728871200, 1728957600, 1729044000, 1729130400, 1729216800],
                "indicators": {
                    "quote": [{
                        "close": [1040.0, 1035.0, null, 1025.0, 1030.0]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_meta_and_closes() {
        let chart = parse_chart(TSMC_CHART).unwrap().expect("chart result");

        assert_eq!(chart.meta.regular_market_price, Some(1030.0));
        assert_eq!(chart.meta.current_price, None);
        assert_eq!(
            chart.meta.long_name.as_deref(),
            Some("Taiwan Semiconductor Manufacturing Company Limited")
        );

        let closes: Vec<f64> = chart.closing_prices().iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1040.0, 1035.0, 1025.0, 1030.0]);
    }

    #[test]
    fn test_closing_prices_keep_session_dates() {
        let chart = parse_chart(TSMC_CHART).unwrap().unwrap();
        let prices = chart.closing_prices();
        assert_eq!(prices[0].date.timestamp(), 1728871200);
        // the null close on the third session is skipped
        assert_eq!(prices[2].date.timestamp(), 1729130400);
    }

    #[test]
    fn test_parse_chart_not_found_is_empty() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse_chart(body).unwrap().is_none());
    }

    #[test]
    fn test_parse_chart_other_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid range"}}}"#;
        let error = parse_chart(body).unwrap_err();
        assert!(matches!(error, StockDataError::ProviderError(_)));
    }

    #[test]
    fn test_parse_chart_without_series() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":50.1}}],"error":null}}"#;
        let chart = parse_chart(body).unwrap().unwrap();
        assert_eq!(chart.meta.regular_market_price, Some(50.1));
        assert!(chart.closing_prices().is_empty());
    }

    #[test]
    fn test_parse_chart_garbage() {
        let error = parse_chart("<html>rate limited</html>").unwrap_err();
        assert!(matches!(error, StockDataError::ParseError(_)));
    }

    #[test]
    fn test_chart_url() {
        let provider = YahooFinanceProvider::new("https://query1.finance.yahoo.com/");
        assert_eq!(provider.name(), "Yahoo Finance");
        assert_eq!(
            provider.chart_url("2330.TW", 5),
            "https://query1.finance.yahoo.com/v8/finance/chart/2330.TW?range=5d&interval=1d"
        );
    }
}
