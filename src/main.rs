use anyhow::{anyhow, Context, Result};
use jupiter_swap_executor::{
    api,
    config::{self, Config},
    gate::TradingGate,
    handlers::AppState,
    jupiter::JupiterClient,
    orchestrator::{SwapOrchestrator, SwapSettings},
    submit::RpcSubmitter,
    wallet,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3301";

fn operator_token() -> Result<String> {
    let token = std::env::var("OPERATOR_TOKEN").context("OPERATOR_TOKEN must be set")?;
    // has to fit in an Authorization header
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_graphic()) {
        return Err(anyhow!("OPERATOR_TOKEN must be non-empty printable ASCII"));
    }
    Ok(token)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let operator_token = operator_token()?;

    let config_path = config::config_path();
    let config = Config::load_or_init(&config_path)?;
    info!("Loaded config from {}: {:?}", config_path.display(), config);

    // A bad key disables trading, not the process
    let wallet = match wallet::load(config.wallet_secret.as_ref()) {
        Ok(wallet) => wallet.map(Arc::new),
        Err(err) => {
            error!("{}; trading unavailable", err);
            None
        }
    };
    if wallet.is_none() {
        warn!(
            "No wallet loaded, swaps will be refused. Set wallet_private_key in {}",
            config_path.display()
        );
    }

    let jupiter = Arc::new(
        JupiterClient::new(config.jupiter_api_url.clone(), config.request_timeout)
            .context("Failed to build HTTP client")?,
    );
    let submitter = Arc::new(RpcSubmitter::new(
        config.rpc_url.to_string(),
        config.request_timeout,
    ));

    let orchestrator = SwapOrchestrator::new(
        jupiter.clone(),
        jupiter,
        submitter,
        Arc::new(TradingGate::new()),
        wallet,
        SwapSettings::from_config(&config),
    );

    let state = Arc::new(AppState {
        orchestrator,
        buy_presets: config.buy_presets.clone(),
    });
    let app = api::build_router(state, &operator_token);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("Invalid BIND_ADDR")?;

    info!("Swap executor ready on http://{} (trading disabled)", addr);
    axum::Server::try_bind(&addr)
        .with_context(|| format!("Failed to bind {}", addr))?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
