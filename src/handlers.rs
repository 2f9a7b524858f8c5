use crate::error::SwapErrorKind;
use crate::models::{
    BuyOptionsResponse, BuyRequest, StatusResponse, SwapOutcome, SwapStatusResponse,
    TradingStateResponse, TransactionId,
};
use crate::orchestrator::SwapOrchestrator;
use crate::utils::{self, ApiResponse};
use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

// Shared state behind the operator API
pub struct AppState {
    pub orchestrator: SwapOrchestrator,
    pub buy_presets: Vec<Decimal>,
}

// Swap result plus the line shown to the operator
#[derive(Serialize)]
struct SwapResponse<'a> {
    message: String,
    #[serde(flatten)]
    outcome: &'a SwapOutcome,
}

fn status_for(kind: SwapErrorKind) -> StatusCode {
    match kind {
        SwapErrorKind::NotReady | SwapErrorKind::InvalidCredential => StatusCode::CONFLICT,
        SwapErrorKind::InvalidAmount => StatusCode::BAD_REQUEST,
        SwapErrorKind::QuoteUnavailable
        | SwapErrorKind::SwapBuildFailed
        | SwapErrorKind::MalformedTransaction
        | SwapErrorKind::SubmissionFailed => StatusCode::BAD_GATEWAY,
    }
}

// Handler for health check
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// Handler for wallet and trading status
pub async fn status(Extension(state): Extension<Arc<AppState>>) -> ApiResponse {
    let orchestrator = &state.orchestrator;
    let settings = orchestrator.settings();

    utils::build_success_response(StatusResponse {
        wallet: orchestrator.wallet_pubkey().map(|k| k.to_string()),
        trading_enabled: orchestrator.is_trading_enabled(),
        input_symbol: settings.pair.input.symbol.clone(),
        output_symbol: settings.pair.output.symbol.clone(),
        slippage_bps: settings.slippage_bps,
    })
}

pub async fn start_trading(Extension(state): Extension<Arc<AppState>>) -> ApiResponse {
    let changed = state.orchestrator.enable_trading();
    utils::build_success_response(TradingStateResponse {
        trading_enabled: state.orchestrator.is_trading_enabled(),
        changed,
    })
}

pub async fn stop_trading(Extension(state): Extension<Arc<AppState>>) -> ApiResponse {
    let changed = state.orchestrator.disable_trading();
    utils::build_success_response(TradingStateResponse {
        trading_enabled: state.orchestrator.is_trading_enabled(),
        changed,
    })
}

// Preset amounts, only offered when a swap could actually run
pub async fn buy_options(Extension(state): Extension<Arc<AppState>>) -> ApiResponse {
    if let Err(err) = state.orchestrator.ensure_ready() {
        return utils::build_error_response(status_for(err.kind()), &err.to_string());
    }

    let pair = &state.orchestrator.settings().pair;
    utils::build_success_response(BuyOptionsResponse {
        input_symbol: pair.input.symbol.clone(),
        output_symbol: pair.output.symbol.clone(),
        presets: state.buy_presets.clone(),
    })
}

// Handler for executing a swap
pub async fn buy(
    Extension(state): Extension<Arc<AppState>>,
    payload: std::result::Result<Json<BuyRequest>, JsonRejection>,
) -> ApiResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected buy request: {}", rejection);
            return utils::build_error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid buy request: {}", rejection),
            );
        }
    };
    info!("Buy requested for {}", request.amount);

    let outcome = state.orchestrator.request_swap(request.amount).await;
    let body = SwapResponse {
        message: outcome.to_string(),
        outcome: &outcome,
    };

    match &outcome {
        SwapOutcome::Succeeded(_) => utils::build_success_response(body),
        SwapOutcome::Failed(failure) => {
            warn!("Buy of {} failed: {}", request.amount, failure.message);
            utils::build_api_response(status_for(failure.kind), Some(body), Some(outcome.to_string()))
        }
    }
}

// Handler for checking a submitted transaction
pub async fn swap_status(
    Extension(state): Extension<Arc<AppState>>,
    Path(signature): Path<String>,
) -> ApiResponse {
    let id = TransactionId(signature);

    match state.orchestrator.confirmation_status(&id).await {
        Ok(confirmation) => utils::build_success_response(SwapStatusResponse {
            explorer_url: utils::explorer_url(id.as_str()),
            transaction_id: id,
            confirmation,
        }),
        Err(err) => {
            error!("Failed to get status for {}: {}", id, err);
            let max_len = state.orchestrator.settings().max_message_len;
            utils::build_error_response(StatusCode::BAD_GATEWAY, &err.display_message(max_len))
        }
    }
}
