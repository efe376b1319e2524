use std::sync::Arc;

use crate::ai::{AiBackend, GeminiBackend};
use crate::config::Config;
use crate::line::{LineMessagingClient, ReplySender};
use crate::stock::{MarketDataProvider, StockService, YahooFinanceProvider};

/// Clients shared by every request.
///
/// Built once at startup and held for the life of the process. Nothing in
/// here is mutated after construction, so concurrent requests share it freely.
#[derive(Clone)]
pub struct BotContext {
    pub channel_secret: String,
    pub stocks: StockService,
    pub ai: Arc<dyn AiBackend>,
    pub messenger: Arc<dyn ReplySender>,
}

impl BotContext {
    pub fn new(
        channel_secret: impl Into<String>,
        market: Arc<dyn MarketDataProvider>,
        ai: Arc<dyn AiBackend>,
        messenger: Arc<dyn ReplySender>,
    ) -> Self {
        Self {
            channel_secret: channel_secret.into(),
            stocks: StockService::new(market),
            ai,
            messenger,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let market = Arc::new(YahooFinanceProvider::new(&config.yahoo_finance_base));
        let ai = Arc::new(GeminiBackend::new(
            config.gemini_api_key.clone(),
            config.gemini_api_base.clone(),
            config.gemini_model.clone(),
        ));
        let messenger = Arc::new(LineMessagingClient::new(
            &config.line_api_base,
            &config.line_channel_access_token,
        ));

        log::info!(
            "🔧 Context ready: market={}, ai={} ({})",
            market.name(),
            ai.name(),
            config.gemini_model
        );

        Self::new(config.line_channel_secret.clone(), market, ai, messenger)
    }
}
