//! Stub collaborators for driving the swap engine without a network.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use solana_sdk::{
    hash::Hash,
    message::{Message, VersionedMessage},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    system_instruction,
    transaction::VersionedTransaction,
};

use jupiter_swap_executor::{
    error::{Result, SwapError},
    gate::TradingGate,
    models::{
        ConfirmationState, Quote, QuoteRequest, SwapPair, TokenInfo, TransactionId,
        UnsignedSwapTransaction, USDC_DECIMALS, USDC_MINT,
    },
    orchestrator::{SwapOrchestrator, SwapSettings},
    quote::QuoteSource,
    submit::TransactionSubmitter,
    swap::SwapTransactionSource,
    wallet::WalletIdentity,
};

pub const QUOTED_OUT_AMOUNT: u64 = 1_432_100;

pub fn pair() -> SwapPair {
    SwapPair {
        input: TokenInfo::sol(),
        output: TokenInfo {
            symbol: "USDC".to_string(),
            mint: Pubkey::from_str(USDC_MINT).unwrap(),
            decimals: USDC_DECIMALS,
        },
    }
}

pub fn settings() -> SwapSettings {
    SwapSettings {
        pair: pair(),
        slippage_bps: 50,
        wrap_and_unwrap_sol: true,
        max_message_len: 100,
    }
}

pub fn wallet() -> Arc<WalletIdentity> {
    Arc::new(WalletIdentity::from_keypair(Keypair::new()))
}

/// An unsigned transfer paid by `payer`, moving `lamports` so tests can
/// tell transactions apart after signing.
pub fn unsigned_transfer(payer: &Pubkey, lamports: u64) -> UnsignedSwapTransaction {
    let ix = system_instruction::transfer(payer, &Pubkey::new_unique(), lamports);
    let message = Message::new_with_blockhash(&[ix], Some(payer), &Hash::new_unique());
    let transaction = VersionedTransaction {
        signatures: vec![Signature::default()],
        message: VersionedMessage::Legacy(message),
    };
    UnsignedSwapTransaction {
        bytes: bincode::serialize(&transaction).unwrap(),
        last_valid_block_height: Some(1),
    }
}

/// Lamports moved by a transaction built with [`unsigned_transfer`].
pub fn transfer_lamports(transaction: &VersionedTransaction) -> u64 {
    let data = &transaction.message.instructions()[0].data;
    u64::from_le_bytes(data[4..12].try_into().unwrap())
}

// ── Quote source ───────────────────────────────────────────────────────────

pub enum QuoteBehavior {
    /// Echo the request back with a fixed output amount.
    Echo,
    Fail(String),
    /// Never answer within a test's lifetime.
    Hang,
}

pub struct StubQuotes {
    behavior: QuoteBehavior,
    delay: Duration,
    route_label: String,
    pub requests: Mutex<Vec<QuoteRequest>>,
}

impl StubQuotes {
    pub fn new(behavior: QuoteBehavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            route_label: "stub-route".to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn echo() -> Self {
        Self::new(QuoteBehavior::Echo)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_route_label(mut self, label: &str) -> Self {
        self.route_label = label.to_string();
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl QuoteSource for StubQuotes {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::time::sleep(self.delay).await;

        match &self.behavior {
            QuoteBehavior::Echo => Ok(Quote {
                input_mint: request.input_mint,
                output_mint: request.output_mint,
                in_amount: request.amount,
                out_amount: QUOTED_OUT_AMOUNT,
                raw: json!({
                    "inAmount": request.amount.to_string(),
                    "outAmount": QUOTED_OUT_AMOUNT.to_string(),
                    "routeLabel": self.route_label,
                }),
            }),
            QuoteBehavior::Fail(message) => Err(SwapError::QuoteUnavailable(message.clone())),
            QuoteBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(SwapError::QuoteUnavailable("hung".to_string()))
            }
        }
    }
}

// ── Swap builder ───────────────────────────────────────────────────────────

pub enum BuildBehavior {
    /// Transfer paid by the requesting wallet, moving the quoted amount.
    PaidByUser,
    /// Transfer paid by someone else.
    ForeignPayer,
    Garbage,
    Fail(String),
}

pub struct StubBuilder {
    behavior: BuildBehavior,
    /// Stop trading while the build is in flight.
    stop_gate: Option<Arc<TradingGate>>,
    pub received_quotes: Mutex<Vec<serde_json::Value>>,
    calls: AtomicUsize,
}

impl StubBuilder {
    pub fn new(behavior: BuildBehavior) -> Self {
        Self {
            behavior,
            stop_gate: None,
            received_quotes: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn ok() -> Self {
        Self::new(BuildBehavior::PaidByUser)
    }

    pub fn stopping(mut self, gate: Arc<TradingGate>) -> Self {
        self.stop_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SwapTransactionSource for StubBuilder {
    async fn build_swap_transaction(
        &self,
        quote: Quote,
        user_public_key: &Pubkey,
        _wrap_and_unwrap_sol: bool,
    ) -> Result<UnsignedSwapTransaction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received_quotes.lock().unwrap().push(quote.raw.clone());
        tokio::task::yield_now().await;

        if let Some(gate) = &self.stop_gate {
            gate.disable();
        }

        match &self.behavior {
            BuildBehavior::PaidByUser => Ok(unsigned_transfer(user_public_key, quote.in_amount)),
            BuildBehavior::ForeignPayer => {
                Ok(unsigned_transfer(&Pubkey::new_unique(), quote.in_amount))
            }
            BuildBehavior::Garbage => Ok(UnsignedSwapTransaction {
                bytes: vec![0xde, 0xad, 0xbe, 0xef],
                last_valid_block_height: None,
            }),
            BuildBehavior::Fail(message) => Err(SwapError::SwapBuildFailed(message.clone())),
        }
    }
}

// ── Submitter ──────────────────────────────────────────────────────────────

pub enum SubmitBehavior {
    Fixed(String),
    /// `SIG_<lamports>`, derived from the signed transaction.
    FromTransfer,
    Fail(String),
}

pub struct StubSubmitter {
    behavior: SubmitBehavior,
    confirmation: ConfirmationState,
    pub submitted: Mutex<Vec<VersionedTransaction>>,
}

impl StubSubmitter {
    pub fn new(behavior: SubmitBehavior) -> Self {
        Self {
            behavior,
            confirmation: ConfirmationState::Confirmed,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn fixed(id: &str) -> Self {
        Self::new(SubmitBehavior::Fixed(id.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionSubmitter for StubSubmitter {
    async fn submit(&self, transaction: &VersionedTransaction) -> Result<TransactionId> {
        self.submitted.lock().unwrap().push(transaction.clone());
        match &self.behavior {
            SubmitBehavior::Fixed(id) => Ok(TransactionId(id.clone())),
            SubmitBehavior::FromTransfer => Ok(TransactionId(format!(
                "SIG_{}",
                transfer_lamports(transaction)
            ))),
            SubmitBehavior::Fail(message) => Err(SwapError::SubmissionFailed(message.clone())),
        }
    }

    async fn confirmation_status(&self, _id: &TransactionId) -> Result<ConfirmationState> {
        Ok(self.confirmation.clone())
    }
}

// ── Wiring ─────────────────────────────────────────────────────────────────

pub struct Harness {
    pub quotes: Arc<StubQuotes>,
    pub builder: Arc<StubBuilder>,
    pub submitter: Arc<StubSubmitter>,
    pub gate: Arc<TradingGate>,
    pub wallet: Option<Arc<WalletIdentity>>,
    pub orchestrator: Arc<SwapOrchestrator>,
}

impl Harness {
    pub fn new(quotes: StubQuotes, builder: StubBuilder, submitter: StubSubmitter) -> Self {
        Self::with_gate(Arc::new(TradingGate::new()), Some(wallet()), quotes, builder, submitter)
    }

    pub fn with_gate(
        gate: Arc<TradingGate>,
        wallet: Option<Arc<WalletIdentity>>,
        quotes: StubQuotes,
        builder: StubBuilder,
        submitter: StubSubmitter,
    ) -> Self {
        let quotes = Arc::new(quotes);
        let builder = Arc::new(builder);
        let submitter = Arc::new(submitter);
        let orchestrator = Arc::new(SwapOrchestrator::new(
            quotes.clone(),
            builder.clone(),
            submitter.clone(),
            gate.clone(),
            wallet.clone(),
            settings(),
        ));
        Self {
            quotes,
            builder,
            submitter,
            gate,
            wallet,
            orchestrator,
        }
    }

    /// Total calls that would have touched the network.
    pub fn network_calls(&self) -> usize {
        self.quotes.calls() + self.builder.calls() + self.submitter.calls()
    }
}
