//! Swap orchestration: quote, build, sign, submit.
//!
//! Each `request_swap` call is an independent run of the state machine
//! `Idle -> Quoting -> Building -> Signing -> Submitted`, ending in a
//! `SwapOutcome` that either succeeded or failed at the last stage entered.
//! Runs share only the trading gate and the wallet, both read-only here.

use crate::config::Config;
use crate::error::{Result, SwapError};
use crate::gate::TradingGate;
use crate::models::{
    ConfirmationState, QuoteRequest, SwapFailure, SwapOutcome, SwapPair, SwapReceipt, SwapStage,
    TransactionId,
};
use crate::quote::QuoteSource;
use crate::submit::{self, TransactionSubmitter};
use crate::swap::SwapTransactionSource;
use crate::utils;
use crate::wallet::WalletIdentity;
use chrono::Utc;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Per-process swap parameters.
#[derive(Debug, Clone)]
pub struct SwapSettings {
    pub pair: SwapPair,
    pub slippage_bps: u16,
    pub wrap_and_unwrap_sol: bool,
    pub max_message_len: usize,
}

impl SwapSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pair: config.pair.clone(),
            slippage_bps: config.slippage_bps,
            wrap_and_unwrap_sol: config.wrap_and_unwrap_sol,
            max_message_len: config.max_message_len,
        }
    }
}

pub struct SwapOrchestrator {
    quotes: Arc<dyn QuoteSource>,
    builder: Arc<dyn SwapTransactionSource>,
    submitter: Arc<dyn TransactionSubmitter>,
    gate: Arc<TradingGate>,
    wallet: Option<Arc<WalletIdentity>>,
    settings: SwapSettings,
}

impl SwapOrchestrator {
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        builder: Arc<dyn SwapTransactionSource>,
        submitter: Arc<dyn TransactionSubmitter>,
        gate: Arc<TradingGate>,
        wallet: Option<Arc<WalletIdentity>>,
        settings: SwapSettings,
    ) -> Self {
        Self {
            quotes,
            builder,
            submitter,
            gate,
            wallet,
            settings,
        }
    }

    pub fn settings(&self) -> &SwapSettings {
        &self.settings
    }

    pub fn wallet_pubkey(&self) -> Option<Pubkey> {
        self.wallet.as_ref().map(|w| w.pubkey())
    }

    pub fn enable_trading(&self) -> bool {
        self.gate.enable()
    }

    pub fn disable_trading(&self) -> bool {
        self.gate.disable()
    }

    pub fn is_trading_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    /// `Err(NotReady)` unless trading is enabled and a wallet is loaded.
    pub fn ensure_ready(&self) -> Result<Arc<WalletIdentity>> {
        if !self.gate.is_enabled() {
            return Err(SwapError::NotReady("trading is disabled".to_string()));
        }
        self.wallet
            .clone()
            .ok_or_else(|| SwapError::NotReady("no wallet loaded".to_string()))
    }

    /// Swap `amount` (display units of the input token). Never panics and
    /// never retries; a failed swap can be requested again from scratch.
    pub async fn request_swap(&self, amount: Decimal) -> SwapOutcome {
        let swap_id = Uuid::new_v4();
        let span = info_span!("swap", %swap_id);
        self.run(amount).instrument(span).await
    }

    pub async fn confirmation_status(&self, id: &TransactionId) -> Result<ConfirmationState> {
        self.submitter.confirmation_status(id).await
    }

    async fn run(&self, amount: Decimal) -> SwapOutcome {
        let pair = &self.settings.pair;
        let mut stage = SwapStage::Idle;

        match self.execute(amount, &mut stage).await {
            Ok(receipt) => {
                info!(
                    "Swap of {} {} -> {} submitted: {}",
                    amount, pair.input.symbol, pair.output.symbol, receipt.explorer_url
                );
                SwapOutcome::Succeeded(receipt)
            }
            Err(err) => {
                error!("Swap of {} {} failed while {}: {}", amount, pair.input.symbol, stage, err);
                SwapOutcome::Failed(SwapFailure::new(
                    &err,
                    stage,
                    amount,
                    pair,
                    self.settings.max_message_len,
                ))
            }
        }
    }

    async fn execute(&self, amount: Decimal, stage: &mut SwapStage) -> Result<SwapReceipt> {
        let wallet = self.ensure_ready()?;
        let pair = &self.settings.pair;

        utils::validate_amount(amount)?;
        let base_units = match utils::ui_amount_to_base_units(amount, pair.input.decimals) {
            Some(0) => {
                return Err(SwapError::InvalidAmount(format!(
                    "{} {} is less than one base unit",
                    amount, pair.input.symbol
                )))
            }
            Some(units) => units,
            None => {
                return Err(SwapError::InvalidAmount(format!(
                    "{} {} does not fit in base units",
                    amount, pair.input.symbol
                )))
            }
        };

        enter(stage, SwapStage::Quoting);
        let request = QuoteRequest {
            input_mint: pair.input.mint,
            output_mint: pair.output.mint,
            amount: base_units,
            slippage_bps: self.settings.slippage_bps,
        };
        let quote = self.unless_stopped(self.quotes.get_quote(&request)).await?;
        let (in_amount, out_amount) = (quote.in_amount, quote.out_amount);

        enter(stage, SwapStage::Building);
        let unsigned = self
            .unless_stopped(self.builder.build_swap_transaction(
                quote,
                &wallet.pubkey(),
                self.settings.wrap_and_unwrap_sol,
            ))
            .await?;

        enter(stage, SwapStage::Signing);
        let signed = submit::sign_transaction(&unsigned, &wallet)?;

        // last chance to honour a stop; submission cannot be called back
        if !self.gate.is_enabled() {
            return Err(stopped());
        }

        enter(stage, SwapStage::Submitted);
        let transaction_id = self.submitter.submit(&signed).await?;

        Ok(SwapReceipt {
            explorer_url: utils::explorer_url(transaction_id.as_str()),
            transaction_id,
            amount,
            in_amount,
            expected_out_amount: utils::base_units_to_ui_amount(out_amount, pair.output.decimals),
            input_symbol: pair.input.symbol.clone(),
            output_symbol: pair.output.symbol.clone(),
            submitted_at: Utc::now(),
        })
    }

    // Abandon a pre-submission step if the operator stops trading meanwhile
    async fn unless_stopped<T>(&self, step: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            result = step => result,
            _ = self.gate.disabled() => Err(stopped()),
        }
    }
}

fn stopped() -> SwapError {
    SwapError::NotReady("trading stopped before submission".to_string())
}

fn enter(stage: &mut SwapStage, next: SwapStage) {
    info!("Swap stage: {} -> {}", stage, next);
    *stage = next;
}
