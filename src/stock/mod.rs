pub mod provider;
pub mod service;
pub mod yahoo;

pub use provider::{ClosingPrice, MarketDataProvider, QuoteInfo, StockDataError};
pub use service::{StockService, StockSnapshot, format_not_found, format_stock_report};
pub use yahoo::YahooFinanceProvider;
