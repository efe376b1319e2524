use std::env;
use log::info;

#[cfg(feature = "axum-server")]
use axum::{Router, routing::get, routing::post};

#[cfg(feature = "lambda")]
use lambda_runtime::{LambdaEvent, service_fn};

use crate::context::BotContext;

#[cfg(feature = "lambda")]
use crate::handlers::lambda_handler;

pub const RUNNING_MESSAGE: &str = "LINE Stock Bot is Running!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Lambda,
    Webhook,
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentMode::Lambda => write!(f, "AWS LAMBDA"),
            DeploymentMode::Webhook => write!(f, "WEBHOOK SERVER"),
        }
    }
}

pub fn is_lambda_environment() -> bool {
    // Check if running on AWS Lambda
    env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() ||
    env::var("LAMBDA_RUNTIME_API").is_ok() ||
    // Manual override
    env::var("LAMBDA_MODE").map(|v| v == "true").unwrap_or(false)
}

pub fn detect_deployment_mode() -> DeploymentMode {
    if is_lambda_environment() {
        DeploymentMode::Lambda
    } else {
        DeploymentMode::Webhook
    }
}

#[cfg(feature = "lambda")]
pub async fn run_lambda_mode(ctx: BotContext) -> Result<(), Box<dyn std::error::Error>> {
    info!("☁️ AWS Lambda environment detected - setting up Lambda runtime");
    info!("👂 Lambda handler ready to receive callbacks!");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<serde_json::Value>| {
        let ctx = ctx.clone();
        async move { lambda_handler(&ctx, event).await }
    }))
    .await
    .map_err(|e| format!("Lambda runtime failed: {e}").into())
}

#[cfg(feature = "axum-server")]
mod server {
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use log::{info, warn};

    use super::RUNNING_MESSAGE;
    use crate::context::BotContext;
    use crate::handlers::{SIGNATURE_HEADER, handle_callback};

    pub async fn health_check() -> &'static str {
        RUNNING_MESSAGE
    }

    pub async fn callback(
        State(ctx): State<BotContext>,
        headers: HeaderMap,
        body: Bytes,
    ) -> (StatusCode, &'static str) {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());

        match handle_callback(&ctx, signature, &body).await {
            Ok(handled) => {
                info!("✅ Callback done, answered {handled} message(s)");
                (StatusCode::OK, "OK")
            }
            Err(e) => {
                warn!("❌ Rejected callback: {e}");
                (StatusCode::BAD_REQUEST, "")
            }
        }
    }
}

#[cfg(feature = "axum-server")]
pub fn router(ctx: BotContext) -> Router {
    Router::new()
        .route("/", get(server::health_check))
        .route("/callback", post(server::callback))
        .with_state(ctx)
}

#[cfg(feature = "axum-server")]
pub async fn run_webhook_mode(ctx: BotContext, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    info!("🌐 Running in WEBHOOK mode");

    let app = router(ctx);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| format!("Failed to bind to port: {e}"))?;

    info!("👂 Webhook server listening on port {port} - ready to receive callbacks!");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server failed: {e}").into())
}
