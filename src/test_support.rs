//! In-memory collaborators for tests.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::sync::{Arc, Mutex};

use crate::ai::AiBackend;
use crate::context::BotContext;
use crate::error::BotError;
use crate::line::ReplySender;
use crate::stock::{ClosingPrice, MarketDataProvider, QuoteInfo, StockDataError};

pub const TEST_SECRET: &str = "test_channel_secret";

/// Sign a body the way LINE does: base64(HMAC-SHA256(secret, body))
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Daily closes starting from a fixed session
pub fn closes(values: &[f64]) -> Vec<ClosingPrice> {
    let start = DateTime::from_timestamp(1_728_871_200, 0).unwrap_or_else(Utc::now);
    values
        .iter()
        .enumerate()
        .map(|(i, &close)| ClosingPrice {
            date: start + Duration::days(i as i64),
            close,
        })
        .collect()
}

pub fn context_with(
    market: Arc<FakeMarketData>,
    ai: Arc<FakeAi>,
    messenger: Arc<FakeMessenger>,
) -> BotContext {
    BotContext::new(TEST_SECRET, market, ai, messenger)
}

/// Market data keyed by full identifier; unknown identifiers are empty.
#[derive(Default)]
pub struct FakeMarketData {
    data: HashMap<String, (QuoteInfo, Vec<ClosingPrice>)>,
    fail: bool,
    failing_history: HashSet<String>,
    requests: Mutex<Vec<String>>,
    history_requests: Mutex<Vec<String>>,
}

impl FakeMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_symbol(mut self, symbol: &str, info: QuoteInfo, history: &[f64]) -> Self {
        self.data
            .insert(symbol.to_string(), (info, closes(history)));
        self
    }

    /// History requests for `symbol` fail with a network error
    pub fn with_failing_history(mut self, symbol: &str) -> Self {
        self.failing_history.insert(symbol.to_string());
        self
    }

    /// Identifiers passed to `close_history` only, in call order
    pub fn requested_histories(&self) -> Vec<String> {
        self.history_requests.lock().unwrap().clone()
    }

    /// Every identifier passed to either lookup, in call order
    pub fn requested_symbols(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, symbol: &str) -> Result<(), StockDataError> {
        self.requests.lock().unwrap().push(symbol.to_string());
        if self.fail {
            return Err(StockDataError::NetworkError("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataProvider for FakeMarketData {
    fn name(&self) -> &str {
        "fake market"
    }

    async fn quote_info(&self, symbol: &str) -> Result<QuoteInfo, StockDataError> {
        self.record(symbol)?;
        Ok(self
            .data
            .get(symbol)
            .map(|(info, _)| info.clone())
            .unwrap_or_default())
    }

    async fn close_history(
        &self,
        symbol: &str,
        _days: u32,
    ) -> Result<Vec<ClosingPrice>, StockDataError> {
        self.record(symbol)?;
        self.history_requests.lock().unwrap().push(symbol.to_string());
        if self.failing_history.contains(symbol) {
            return Err(StockDataError::NetworkError("history timed out".to_string()));
        }
        Ok(self
            .data
            .get(symbol)
            .map(|(_, history)| history.clone())
            .unwrap_or_default())
    }
}

pub struct FakeAi {
    response: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeAi {
    pub fn replying(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiBackend for FakeAi {
    async fn chat(&self, message: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.prompts.lock().unwrap().push(message.to_string());
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err("quota exceeded".into()),
        }
    }

    fn name(&self) -> &'static str {
        "fake ai"
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    fail: bool,
    replies: Mutex<Vec<(String, String)>>,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// (reply token, text) pairs in send order, failed sends included
    pub fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySender for FakeMessenger {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), BotError> {
        self.replies
            .lock()
            .unwrap()
            .push((reply_token.to_string(), text.to_string()));
        if self.fail {
            return Err(BotError::ReplyFailed("status 400: Invalid reply token".to_string()));
        }
        Ok(())
    }
}

/// Webhook body with one text message event per (token, text) pair
pub fn text_events_body(messages: &[(&str, &str)]) -> Vec<u8> {
    let events: Vec<serde_json::Value> = messages
        .iter()
        .map(|(token, text)| {
            serde_json::json!({
                "type": "message",
                "mode": "active",
                "replyToken": token,
                "source": {"type": "user", "userId": "U4af4980629"},
                "message": {"id": "1", "type": "text", "text": text},
            })
        })
        .collect();
    serde_json::json!({"destination": "U0123", "events": events})
        .to_string()
        .into_bytes()
}
