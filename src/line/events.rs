use serde::Deserialize;

use crate::error::BotError;

/// Top-level webhook body
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl WebhookPayload {
    pub fn parse(body: &[u8]) -> Result<Self, BotError> {
        serde_json::from_slice(body).map_err(|e| BotError::MalformedPayload(e.to_string()))
    }
}

/// Raw webhook event, tagged by `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Message {
        // Absent for events delivered in standby mode
        #[serde(rename = "replyToken", default)]
        reply_token: Option<String>,
        message: MessageContent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// What the webhook layer does with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    TextMessage { reply_token: String, text: String },
    Other,
}

impl From<Event> for InboundEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Message {
                reply_token: Some(reply_token),
                message: MessageContent::Text { text },
            } => InboundEvent::TextMessage { reply_token, text },
            _ => InboundEvent::Other,
        }
    }
}
