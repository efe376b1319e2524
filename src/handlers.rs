use log::{info, warn};

#[cfg(feature = "lambda")]
use lambda_runtime::{Error as LambdaError, LambdaEvent};
#[cfg(feature = "lambda")]
use serde_json::Value;

use crate::commands::{Command, answer};
use crate::context::BotContext;
#[cfg(feature = "lambda")]
use crate::deployment::RUNNING_MESSAGE;
use crate::error::BotError;
use crate::line::{InboundEvent, WebhookPayload, verify_signature};

pub const SIGNATURE_HEADER: &str = "X-Line-Signature";

/// Verify, parse and dispatch one webhook delivery.
///
/// Returns the number of text messages answered. Rejections
/// (`InvalidSignature`, `MalformedPayload`) happen before any reply is sent.
pub async fn handle_callback(
    ctx: &BotContext,
    signature: Option<&str>,
    body: &[u8],
) -> Result<usize, BotError> {
    let Some(signature) = signature else {
        warn!("❌ Callback without {SIGNATURE_HEADER} header");
        return Err(BotError::InvalidSignature);
    };

    if !verify_signature(&ctx.channel_secret, body, signature) {
        warn!("❌ Callback signature mismatch");
        return Err(BotError::InvalidSignature);
    }

    let payload = WebhookPayload::parse(body)?;
    info!(
        "🔗 Webhook for {} received {} event(s)",
        payload.destination.as_deref().unwrap_or("<unknown>"),
        payload.events.len()
    );

    let mut handled = 0;
    for event in payload.events {
        match InboundEvent::from(event) {
            InboundEvent::TextMessage { reply_token, text } => {
                handle_text_message(ctx, &reply_token, &text).await;
                handled += 1;
            }
            InboundEvent::Other => {
                info!("🔄 Ignoring non-text event");
            }
        }
    }

    Ok(handled)
}

/// Answer one text message with exactly one reply call.
pub async fn handle_text_message(ctx: &BotContext, reply_token: &str, text: &str) {
    info!("📝 Processing message: '{text}'");

    let reply = answer(ctx, Command::parse(text)).await;

    info!("📤 Sending reply ({} chars)", reply.chars().count());
    if let Err(e) = ctx.messenger.reply_text(reply_token, &reply).await {
        warn!("⚠️ {e}");
    }
}

#[cfg(feature = "lambda")]
fn find_signature(headers: Option<&Value>) -> Option<&str> {
    headers?
        .as_object()?
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(SIGNATURE_HEADER))
        .and_then(|(_, value)| value.as_str())
}

#[cfg(feature = "lambda")]
fn extract_body(payload: &Value) -> Option<Vec<u8>> {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    let body = payload.get("body").and_then(|b| b.as_str())?;
    let encoded = payload
        .get("isBase64Encoded")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if encoded {
        STANDARD.decode(body).ok()
    } else {
        Some(body.as_bytes().to_vec())
    }
}

#[cfg(feature = "lambda")]
fn proxy_route(payload: &Value) -> (String, &str) {
    // REST API events use httpMethod/path, HTTP API and function URLs use requestContext.http/rawPath
    let method = payload
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| payload.pointer("/requestContext/http/method").and_then(Value::as_str))
        .unwrap_or_default()
        .to_ascii_uppercase();
    let path = payload
        .get("path")
        .and_then(Value::as_str)
        .or_else(|| payload.get("rawPath").and_then(Value::as_str))
        .unwrap_or_default();
    (method, path)
}

#[cfg(feature = "lambda")]
async fn proxy_callback(ctx: &BotContext, payload: &Value) -> Value {
    let signature = find_signature(payload.get("headers"));

    let Some(body) = extract_body(payload) else {
        warn!("❌ No usable body field found in Lambda event");
        return serde_json::json!({ "statusCode": 400, "body": "" });
    };

    match handle_callback(ctx, signature, &body).await {
        Ok(_) => serde_json::json!({ "statusCode": 200, "body": "OK" }),
        Err(e) => {
            warn!("❌ Rejected Lambda callback: {e}");
            serde_json::json!({ "statusCode": 400, "body": "" })
        }
    }
}

/// Route an API Gateway proxy event the same way the axum router does.
#[cfg(feature = "lambda")]
pub async fn route_proxy_event(ctx: &BotContext, payload: &Value) -> Value {
    let (method, path) = proxy_route(payload);
    info!("🔗 Lambda received {method} {path}");

    match (method.as_str(), path) {
        ("GET", "/") => serde_json::json!({ "statusCode": 200, "body": RUNNING_MESSAGE }),
        ("POST", "/callback") => proxy_callback(ctx, payload).await,
        _ => {
            warn!("❓ No route for {method} {path}");
            serde_json::json!({ "statusCode": 404, "body": "" })
        }
    }
}

#[cfg(feature = "lambda")]
pub async fn lambda_handler(
    ctx: &BotContext,
    event: LambdaEvent<Value>,
) -> Result<Value, LambdaError> {
    Ok(route_proxy_event(ctx, &event.payload).await)
}
