use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error types for market data operations
#[derive(Debug, thiserror::Error)]
pub enum StockDataError {
    /// Request never produced a response
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Provider answered with a non-success status
    #[error("Provider returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    /// Failed to parse response
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Provider-specific error
    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl From<reqwest::Error> for StockDataError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            StockDataError::ParseError(error.to_string())
        } else if let Some(status) = error.status() {
            StockDataError::HttpStatus {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            StockDataError::NetworkError(error.to_string())
        }
    }
}

/// Point-in-time quote fields for one market identifier.
///
/// Every field is optional: a provider may omit any of them, and an unknown
/// symbol yields the all-`None` default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInfo {
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub long_name: Option<String>,
}

impl QuoteInfo {
    /// True when at least one of the two price fields is present.
    pub fn has_price(&self) -> bool {
        self.current_price.is_some() || self.regular_market_price.is_some()
    }
}

/// End-of-day close for one trading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingPrice {
    pub date: DateTime<Utc>,
    pub close: f64,
}

/// Trait for market data providers
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Fetch quote fields for a fully qualified identifier (e.g. "2330.TW")
    async fn quote_info(&self, symbol: &str) -> Result<QuoteInfo, StockDataError>;

    /// Fetch daily closes for the trailing `days` window, oldest first.
    /// May return fewer entries than requested around holidays.
    async fn close_history(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<ClosingPrice>, StockDataError>;
}
