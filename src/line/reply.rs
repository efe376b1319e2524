use async_trait::async_trait;
use serde_json::json;

use crate::error::BotError;

/// Sends the single reply allowed per reply token
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), BotError>;
}

/// LINE Messaging API reply client
pub struct LineMessagingClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl LineMessagingClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn reply_url(&self) -> String {
        format!("{}/v2/bot/message/reply", self.base_url)
    }
}

fn reply_body(reply_token: &str, text: &str) -> serde_json::Value {
    json!({
        "replyToken": reply_token,
        "messages": [{ "type": "text", "text": text }],
    })
}

#[async_trait]
impl ReplySender for LineMessagingClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), BotError> {
        let response = self
            .client
            .post(self.reply_url())
            .bearer_auth(&self.access_token)
            .json(&reply_body(reply_token, text))
            .send()
            .await
            .map_err(|e| BotError::ReplyFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BotError::ReplyFailed(format!("status {status}: {detail}")));
        }

        Ok(())
    }
}
