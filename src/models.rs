use crate::error::{SwapError, SwapErrorKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const USDC_DECIMALS: u8 = 6;

// A token the executor can trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: String,
    pub mint: Pubkey,
    pub decimals: u8,
}

impl TokenInfo {
    pub fn sol() -> Self {
        Self {
            symbol: "SOL".to_string(),
            mint: spl_token::native_mint::id(),
            decimals: spl_token::native_mint::DECIMALS,
        }
    }
}

/// The fixed input/output pair every swap request trades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPair {
    pub input: TokenInfo,
    pub output: TokenInfo,
}

// What the orchestrator asks the quote service for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub amount: u64,
    pub slippage_bps: u16,
}

/// A routing quote. Not `Clone`: a quote is consumed by exactly one swap
/// build and a retry must fetch a fresh one.
#[derive(Debug, PartialEq)]
pub struct Quote {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub in_amount: u64,
    pub out_amount: u64,
    /// The quote service response, forwarded untouched to the swap service.
    pub raw: serde_json::Value,
}

/// Transaction bytes returned by the swap service, not yet trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedSwapTransaction {
    pub bytes: Vec<u8>,
    pub last_valid_block_height: Option<u64>,
}

// Identifier of a submitted transaction (the base-58 signature on mainnet)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Non-terminal orchestration stages; the end state is a `SwapOutcome`
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SwapStage {
    Idle,
    Quoting,
    Building,
    Signing,
    Submitted,
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapStage::Idle => write!(f, "idle"),
            SwapStage::Quoting => write!(f, "quoting"),
            SwapStage::Building => write!(f, "building"),
            SwapStage::Signing => write!(f, "signing"),
            SwapStage::Submitted => write!(f, "submitted"),
        }
    }
}

// Receipt for a submitted swap
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SwapReceipt {
    pub transaction_id: TransactionId,
    pub explorer_url: String,
    pub amount: Decimal,
    pub in_amount: u64,
    pub expected_out_amount: Decimal,
    pub input_symbol: String,
    pub output_symbol: String,
    pub submitted_at: DateTime<Utc>,
}

// Why a swap ended in the failed state
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SwapFailure {
    pub kind: SwapErrorKind,
    /// Last non-terminal stage entered before failing.
    pub stage: SwapStage,
    pub amount: Decimal,
    pub input_symbol: String,
    pub output_symbol: String,
    /// Truncated diagnostic.
    pub message: String,
}

/// Terminal state of one orchestration.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SwapOutcome {
    Succeeded(SwapReceipt),
    Failed(SwapFailure),
}

impl SwapOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SwapOutcome::Succeeded(_))
    }

    pub fn transaction_id(&self) -> Option<&TransactionId> {
        match self {
            SwapOutcome::Succeeded(receipt) => Some(&receipt.transaction_id),
            SwapOutcome::Failed(_) => None,
        }
    }

    pub fn failure_kind(&self) -> Option<SwapErrorKind> {
        match self {
            SwapOutcome::Succeeded(_) => None,
            SwapOutcome::Failed(failure) => Some(failure.kind),
        }
    }
}

impl fmt::Display for SwapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapOutcome::Succeeded(r) => write!(
                f,
                "Swapped {} {} -> {}, tx: {}",
                r.amount, r.input_symbol, r.output_symbol, r.explorer_url
            ),
            SwapOutcome::Failed(e) => write!(
                f,
                "Swap of {} {} failed: {}",
                e.amount, e.input_symbol, e.message
            ),
        }
    }
}

impl SwapFailure {
    pub fn new(
        error: &SwapError,
        stage: SwapStage,
        amount: Decimal,
        pair: &SwapPair,
        max_message_len: usize,
    ) -> Self {
        Self {
            kind: error.kind(),
            stage,
            amount,
            input_symbol: pair.input.symbol.clone(),
            output_symbol: pair.output.symbol.clone(),
            message: error.display_message(max_message_len),
        }
    }
}

// On-chain state of a submitted transaction
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConfirmationState {
    Unknown,
    Processed,
    Confirmed,
    Finalized,
    Failed { error: String },
}

// Swap request body. `amount` is read exactly from a JSON number or string.
#[derive(Deserialize, Debug)]
pub struct BuyRequest {
    pub amount: Decimal,
}

// Status response
#[derive(Serialize, Debug)]
pub struct StatusResponse {
    pub wallet: Option<String>,
    pub trading_enabled: bool,
    pub input_symbol: String,
    pub output_symbol: String,
    pub slippage_bps: u16,
}

// Response to start/stop
#[derive(Serialize, Debug)]
pub struct TradingStateResponse {
    pub trading_enabled: bool,
    pub changed: bool,
}

#[derive(Serialize, Debug)]
pub struct BuyOptionsResponse {
    pub input_symbol: String,
    pub output_symbol: String,
    pub presets: Vec<Decimal>,
}

#[derive(Serialize, Debug)]
pub struct SwapStatusResponse {
    pub transaction_id: TransactionId,
    pub explorer_url: String,
    #[serde(flatten)]
    pub confirmation: ConfirmationState,
}
