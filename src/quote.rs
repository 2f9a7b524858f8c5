//! Quote client

use crate::error::{Result, SwapError};
use crate::jupiter::{self, JupiterClient};
use crate::models::{Quote, QuoteRequest};
use async_trait::async_trait;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::{debug, error, info};

/// Source of routing quotes.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// One attempt, no retries. A failed quote must be re-requested by the
    /// caller with a fresh amount.
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote>;
}

// Fields we check; the full body is kept as the opaque route payload
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JupiterQuoteFields {
    input_mint: String,
    output_mint: String,
    in_amount: String,
    out_amount: String,
}

fn parse_amount(field: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .map_err(|e| SwapError::QuoteUnavailable(format!("invalid {} {:?}: {}", field, value, e)))
}

fn parse_mint(field: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value)
        .map_err(|e| SwapError::QuoteUnavailable(format!("invalid {} {:?}: {}", field, value, e)))
}

/// Validate a raw quote body against the request it answers.
pub fn parse_quote(request: &QuoteRequest, raw: serde_json::Value) -> Result<Quote> {
    let fields: JupiterQuoteFields = serde_json::from_value(raw.clone())
        .map_err(|e| SwapError::QuoteUnavailable(format!("malformed quote response: {}", e)))?;

    let input_mint = parse_mint("inputMint", &fields.input_mint)?;
    let output_mint = parse_mint("outputMint", &fields.output_mint)?;
    let in_amount = parse_amount("inAmount", &fields.in_amount)?;
    let out_amount = parse_amount("outAmount", &fields.out_amount)?;

    if input_mint != request.input_mint
        || output_mint != request.output_mint
        || in_amount != request.amount
    {
        return Err(SwapError::QuoteUnavailable(format!(
            "quote does not match request: got {} {} -> {}, asked {} {} -> {}",
            in_amount,
            input_mint,
            output_mint,
            request.amount,
            request.input_mint,
            request.output_mint
        )));
    }

    Ok(Quote {
        input_mint,
        output_mint,
        in_amount,
        out_amount,
        raw,
    })
}

#[async_trait]
impl QuoteSource for JupiterClient {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote> {
        let url = self.endpoint("quote");
        info!(
            "Getting swap quote from Jupiter: {} {} -> {} ({} bps)",
            request.amount, request.input_mint, request.output_mint, request.slippage_bps
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("inputMint", request.input_mint.to_string()),
                ("outputMint", request.output_mint.to_string()),
                ("amount", request.amount.to_string()),
                ("slippageBps", request.slippage_bps.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Quote request failed: {}", e);
                SwapError::QuoteUnavailable(format!("request to quote service failed: {}", e))
            })?;

        let response = jupiter::error_for_status(response)
            .await
            .map_err(|e| SwapError::QuoteUnavailable(format!("quote service returned {}", e)))?;

        let raw = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| SwapError::QuoteUnavailable(format!("malformed quote response: {}", e)))?;

        let quote = parse_quote(request, raw)?;
        debug!("Quote: {} in, {} out", quote.in_amount, quote.out_amount);
        Ok(quote)
    }
}
