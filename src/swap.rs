//! Swap transaction builder

use crate::error::{Result, SwapError};
use crate::jupiter::{self, JupiterClient};
use crate::models::{Quote, UnsignedSwapTransaction};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::{error, info};

/// Turns a quote into an unsigned transaction for `user_public_key`.
#[async_trait]
pub trait SwapTransactionSource: Send + Sync {
    async fn build_swap_transaction(
        &self,
        quote: Quote,
        user_public_key: &Pubkey,
        wrap_and_unwrap_sol: bool,
    ) -> Result<UnsignedSwapTransaction>;
}

// Jupiter swap request
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JupiterSwapRequest<'a> {
    quote_response: &'a serde_json::Value,
    user_public_key: String,
    wrap_and_unwrap_sol: bool,
}

// Jupiter swap response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JupiterSwapResponse {
    swap_transaction: String,
    #[serde(default)]
    last_valid_block_height: Option<u64>,
}

/// Decode the base64 `swapTransaction` field. Structure is checked later,
/// by the signer.
fn decode_swap_response(response: JupiterSwapResponse) -> Result<UnsignedSwapTransaction> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(response.swap_transaction.trim())
        .map_err(|e| SwapError::SwapBuildFailed(format!("swapTransaction is not base64: {}", e)))?;

    if bytes.is_empty() {
        return Err(SwapError::SwapBuildFailed(
            "swapTransaction is empty".to_string(),
        ));
    }

    Ok(UnsignedSwapTransaction {
        bytes,
        last_valid_block_height: response.last_valid_block_height,
    })
}

#[async_trait]
impl SwapTransactionSource for JupiterClient {
    async fn build_swap_transaction(
        &self,
        quote: Quote,
        user_public_key: &Pubkey,
        wrap_and_unwrap_sol: bool,
    ) -> Result<UnsignedSwapTransaction> {
        let request = JupiterSwapRequest {
            quote_response: &quote.raw,
            user_public_key: user_public_key.to_string(),
            wrap_and_unwrap_sol,
        };

        info!("Requesting swap transaction from Jupiter");
        let response = self
            .http
            .post(self.endpoint("swap"))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Swap build request failed: {}", e);
                SwapError::SwapBuildFailed(format!("request to swap service failed: {}", e))
            })?;

        let response = jupiter::error_for_status(response)
            .await
            .map_err(|e| SwapError::SwapBuildFailed(format!("swap service returned {}", e)))?;

        let body = response
            .json::<JupiterSwapResponse>()
            .await
            .map_err(|e| SwapError::SwapBuildFailed(format!("malformed swap response: {}", e)))?;

        decode_swap_response(body)
    }
}
