use log::{info, warn};

use crate::ai::build_trend_prompt;
use crate::context::BotContext;
use crate::error::BotError;
use crate::stock::{format_not_found, format_stock_report};

pub const USAGE_MESSAGE: &str = "請輸入股票代號 (例如: 2330)";
pub const GENERIC_ERROR_MESSAGE: &str = "查詢發生錯誤，請稍後再試。";
pub const ANALYSIS_UNAVAILABLE: &str = "AI 暫時無法分析";

/// What an inbound text asks for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Text made only of digits (ASCII or other Unicode digits)
    Ticker(String),
    Unrecognized,
}

impl Command {
    /// Trim, uppercase, then classify.
    pub fn parse(text: &str) -> Self {
        let normalized = text.trim().to_uppercase();
        // Unicode-aware so full-width input such as "２３３０" still counts
        if !normalized.is_empty() && normalized.chars().all(char::is_numeric) {
            Command::Ticker(normalized)
        } else {
            Command::Unrecognized
        }
    }
}

/// Produce the one reply string for a command. Never fails: every error
/// kind maps to a fixed user-facing message here.
pub async fn answer(ctx: &BotContext, cmd: Command) -> String {
    info!("💬 Processing command: {cmd:?}");

    match cmd {
        Command::Ticker(ticker) => match analyze_ticker(ctx, &ticker).await {
            Ok(report) => report,
            Err(BotError::NotFound(ticker)) => format_not_found(&ticker),
            Err(e) => {
                warn!("❌ Ticker request for {ticker} failed: {e}");
                GENERIC_ERROR_MESSAGE.to_string()
            }
        },
        Command::Unrecognized => USAGE_MESSAGE.to_string(),
    }
}

async fn analyze_ticker(ctx: &BotContext, ticker: &str) -> Result<String, BotError> {
    let snapshot = ctx.stocks.lookup(ticker).await?;

    let prompt = build_trend_prompt(&snapshot);
    info!("🤖 Requesting trend analysis for {} from {}", snapshot.symbol, ctx.ai.name());

    let analysis = ctx
        .ai
        .chat(&prompt)
        .await
        .map_err(|e| BotError::GenerationFailed(e.to_string()))?;

    let commentary = if analysis.trim().is_empty() {
        info!("🙄 Model returned no text for {}", snapshot.symbol);
        ANALYSIS_UNAVAILABLE
    } else {
        analysis.as_str()
    };

    Ok(format_stock_report(&snapshot, commentary))
}
