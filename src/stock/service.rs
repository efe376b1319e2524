use super::provider::{ClosingPrice, MarketDataProvider, QuoteInfo};
use crate::error::BotError;
use std::fmt;
use std::sync::Arc;

/// Listed (main board) market suffix
pub const PRIMARY_SUFFIX: &str = ".TW";
/// Over-the-counter market suffix, tried when the main board has no price
pub const ALTERNATE_SUFFIX: &str = ".TWO";
/// Trading days of closing prices requested per lookup
pub const HISTORY_DAYS: u32 = 5;

const PRICE_PLACEHOLDER: &str = "N/A";

/// Price shown to the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayPrice {
    Value(f64),
    Unavailable,
}

impl fmt::Display for DisplayPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Debug keeps the trailing ".0" on whole prices (1030.0, not 1030)
            DisplayPrice::Value(price) => write!(f, "{price:?}"),
            DisplayPrice::Unavailable => write!(f, "{PRICE_PLACEHOLDER}"),
        }
    }
}

/// Result of a successful ticker lookup
#[derive(Debug, Clone)]
pub struct StockSnapshot {
    /// Ticker as typed by the user, without suffix
    pub ticker: String,
    /// Identifier that produced the data, e.g. "2330.TW"
    pub symbol: String,
    pub info: QuoteInfo,
    pub history: Vec<ClosingPrice>,
}

impl StockSnapshot {
    pub fn display_price(&self) -> DisplayPrice {
        self.info
            .current_price
            .or(self.info.regular_market_price)
            .map(DisplayPrice::Value)
            .unwrap_or(DisplayPrice::Unavailable)
    }

    pub fn display_name(&self) -> &str {
        self.info.long_name.as_deref().unwrap_or(&self.ticker)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.history.iter().map(|p| p.close).collect()
    }
}

/// Stock service resolving a bare ticker against the two market suffixes
#[derive(Clone)]
pub struct StockService {
    provider: Arc<dyn MarketDataProvider>,
}

impl StockService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Look up quote and recent closes for `ticker`.
    ///
    /// The listed market is tried first. If its quote carries neither price
    /// field, the over-the-counter identifier is used for both quote and
    /// history. History is only fetched for the identifier that was kept.
    /// An empty history is `BotError::NotFound`.
    pub async fn lookup(&self, ticker: &str) -> Result<StockSnapshot, BotError> {
        let mut symbol = format!("{ticker}{PRIMARY_SUFFIX}");
        log::info!("Fetching {symbol} from {}", self.provider.name());

        let mut info = self.provider.quote_info(&symbol).await?;

        if !info.has_price() {
            symbol = format!("{ticker}{ALTERNATE_SUFFIX}");
            log::info!("No listed price for {ticker}, retrying as {symbol}");

            info = self.provider.quote_info(&symbol).await?;
        }

        let history = self.provider.close_history(&symbol, HISTORY_DAYS).await?;

        if history.is_empty() {
            log::info!("No price history for {ticker}");
            return Err(BotError::NotFound(ticker.to_string()));
        }

        log::info!(
            "Resolved {ticker} as {symbol} with {} closing prices",
            history.len()
        );

        Ok(StockSnapshot {
            ticker: ticker.to_string(),
            symbol,
            info,
            history,
        })
    }
}

/// Format the final reply for a resolved stock
pub fn format_stock_report(snapshot: &StockSnapshot, commentary: &str) -> String {
    format!(
        "📊 {}\n股價：{}\n\n🤖 AI 分析：\n{}",
        snapshot.display_name(),
        snapshot.display_price(),
        commentary
    )
}

/// Format the reply for a ticker with no price history
pub fn format_not_found(ticker: &str) -> String {
    format!("找不到代號 {ticker}，請確認是否正確。")
}
