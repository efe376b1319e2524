use std::env;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_LINE_API_BASE: &str = "https://api.line.me";
pub const DEFAULT_YAHOO_FINANCE_BASE: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_PORT: u16 = 8080;

/// Process-wide settings, read once at startup.
///
/// Secrets are not validated here: a missing value becomes an empty string and
/// only surfaces as an error when the matching client call is made.
#[derive(Debug, Clone)]
pub struct Config {
    pub line_channel_access_token: String,
    pub line_channel_secret: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub line_api_base: String,
    pub yahoo_finance_base: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| format!("PORT must be a valid number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            line_channel_access_token: lookup("LINE_CHANNEL_ACCESS_TOKEN").unwrap_or_default(),
            line_channel_secret: lookup("LINE_CHANNEL_SECRET").unwrap_or_default(),
            gemini_api_key: lookup("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: or_default("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            line_api_base: or_default("LINE_API_BASE", DEFAULT_LINE_API_BASE),
            yahoo_finance_base: or_default("YAHOO_FINANCE_BASE", DEFAULT_YAHOO_FINANCE_BASE),
            port,
        })
    }
}
