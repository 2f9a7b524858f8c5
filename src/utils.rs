use crate::error::SwapError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::json;

const EXPLORER_TX_URL: &str = "https://solscan.io/tx";

// Custom API response type that implements IntoResponse
pub struct ApiResponse {
    status: StatusCode,
    body: Json<serde_json::Value>,
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

// 10^decimals as an exact decimal
fn scale_factor(decimals: u8) -> Option<Decimal> {
    10u64.checked_pow(decimals as u32).map(Decimal::from)
}

/// Convert a display amount into integer base units, rounding half away
/// from zero. Returns `None` on overflow or a negative result.
pub fn ui_amount_to_base_units(ui_amount: Decimal, decimals: u8) -> Option<u64> {
    let scaled = ui_amount.checked_mul(scale_factor(decimals)?)?;
    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
}

// Convert integer base units back to a display amount
pub fn base_units_to_ui_amount(amount: u64, decimals: u8) -> Decimal {
    let mut value = Decimal::from(amount);
    // Decimal supports at most 28 fractional digits
    if value.set_scale(decimals.min(28) as u32).is_err() {
        return Decimal::ZERO;
    }
    value.normalize()
}

/// Percentage (e.g. `0.5`) to basis points (e.g. `50`).
pub fn percent_to_bps(percent: Decimal) -> Option<u16> {
    percent
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u16()
}

// Cut a message to `max_chars` characters without splitting a code point
pub fn truncate_chars(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}

pub fn explorer_url(signature: &str) -> String {
    format!("{}/{}", EXPLORER_TX_URL, signature)
}

// Validate amount is positive
pub fn validate_amount(amount: Decimal) -> Result<(), SwapError> {
    if amount <= Decimal::ZERO {
        return Err(SwapError::InvalidAmount(format!(
            "Amount must be greater than zero, got {}",
            amount
        )));
    }
    Ok(())
}

// Helper to build a consistent API response
pub fn build_api_response<T: serde::Serialize>(
    status: StatusCode,
    data: Option<T>,
    error: Option<String>,
) -> ApiResponse {
    let success = error.is_none();

    let response = json!({
        "success": success,
        "data": data,
        "error": error,
    });

    ApiResponse {
        status,
        body: Json(response),
    }
}

// Helper to build error responses
pub fn build_error_response(status: StatusCode, error: &str) -> ApiResponse {
    build_api_response::<()>(status, None, Some(error.to_string()))
}

// Helper to build success responses
pub fn build_success_response<T: serde::Serialize>(data: T) -> ApiResponse {
    build_api_response(StatusCode::OK, Some(data), None)
}
