use log::info;

mod ai;
mod commands;
mod config;
mod context;
mod deployment;
mod error;
mod handlers;
mod line;
mod stock;

#[cfg(test)]
mod test_support;

use config::Config;
use context::BotContext;
use deployment::{DeploymentMode, detect_deployment_mode};

#[cfg(feature = "lambda")]
use deployment::run_lambda_mode;

#[cfg(feature = "axum-server")]
use deployment::run_webhook_mode;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();
    info!("Starting LINE stock bot...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => panic!("Invalid configuration: {e}"),
    };
    let ctx = BotContext::from_config(&config);
    let deployment_mode = detect_deployment_mode();

    info!("🚀 Bot deployment detection: {deployment_mode}");

    let result = match deployment_mode {
        DeploymentMode::Lambda => {
            #[cfg(feature = "lambda")]
            {
                run_lambda_mode(ctx).await
            }
            #[cfg(not(feature = "lambda"))]
            {
                panic!("Lambda environment detected but lambda feature not enabled. Compile with --features lambda");
            }
        }
        DeploymentMode::Webhook => {
            #[cfg(feature = "axum-server")]
            {
                run_webhook_mode(ctx, config.port).await
            }
            #[cfg(not(feature = "axum-server"))]
            {
                panic!("Webhook mode selected but axum-server feature not enabled. Compile with --features axum-server");
            }
        }
    };

    if let Err(e) = result {
        panic!("Bot failed to start: {e}");
    }
}
