use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use std::error::Error;

use crate::stock::StockSnapshot;

// Extensible AI backend trait
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Single-turn completion. `Ok("")` means the model produced no text.
    async fn chat(&self, message: &str) -> Result<String, Box<dyn Error + Send + Sync>>;
    fn name(&self) -> &'static str;
}

// Gemini through its OpenAI-compatible endpoint, using the async-openai SDK
pub struct GeminiBackend {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiBackend {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl AiBackend for GeminiBackend {
    async fn chat(&self, message: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(message)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        Ok(content.to_string())
    }

    fn name(&self) -> &'static str {
        "Google Gemini"
    }
}

/// Build the trend-commentary prompt for a resolved stock
pub fn build_trend_prompt(snapshot: &StockSnapshot) -> String {
    format!(
        "你是專業分析師。請用繁體中文分析「{} ({})」：\n目前股價: {}\n近五日收盤價: {:?}\n請給出100字以內的走勢簡評。",
        snapshot.display_name(),
        snapshot.ticker,
        snapshot.display_price(),
        snapshot.closes()
    )
}
