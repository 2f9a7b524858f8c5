//! Transaction signing and submission
//!
//! Submission is not idempotent. A transaction whose submission outcome is
//! unknown must never be resent; the caller re-quotes and rebuilds instead.

use crate::error::{Result, SwapError};
use crate::models::{ConfirmationState, TransactionId, UnsignedSwapTransaction};
use crate::wallet::WalletIdentity;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    signature::Signature,
    transaction::VersionedTransaction,
};
use solana_transaction_status::{TransactionConfirmationStatus, UiTransactionEncoding};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

/// Broadcasts signed transactions and reports on them afterwards.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, transaction: &VersionedTransaction) -> Result<TransactionId>;

    async fn confirmation_status(&self, id: &TransactionId) -> Result<ConfirmationState>;
}

/// Decode the swap service payload, check it is a transaction our wallet
/// alone must sign and pays for, and sign it.
pub fn sign_transaction(
    unsigned: &UnsignedSwapTransaction,
    wallet: &WalletIdentity,
) -> Result<VersionedTransaction> {
    let transaction: VersionedTransaction = bincode::deserialize(&unsigned.bytes)
        .map_err(|e| SwapError::MalformedTransaction(format!("cannot decode transaction: {}", e)))?;

    let required = transaction.message.header().num_required_signatures as usize;
    if required != 1 {
        return Err(SwapError::MalformedTransaction(format!(
            "transaction requires {} signatures, expected 1",
            required
        )));
    }
    if transaction.signatures.len() != required {
        return Err(SwapError::MalformedTransaction(format!(
            "transaction carries {} signature slots for {} required signers",
            transaction.signatures.len(),
            required
        )));
    }

    let fee_payer = transaction.message.static_account_keys().first();
    if fee_payer != Some(&wallet.pubkey()) {
        return Err(SwapError::MalformedTransaction(format!(
            "fee payer {} is not the wallet {}",
            fee_payer.map(|k| k.to_string()).unwrap_or_else(|| "<none>".to_string()),
            wallet.pubkey()
        )));
    }

    wallet
        .sign_message(transaction.message)
        .map_err(|e| SwapError::MalformedTransaction(format!("cannot sign transaction: {}", e)))
}

/// Submits through a Solana JSON-RPC node.
pub struct RpcSubmitter {
    client: RpcClient,
}

impl RpcSubmitter {
    pub fn new(rpc_url: String, timeout: Duration) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(
            rpc_url,
            timeout,
            CommitmentConfig::confirmed(),
        );
        Self { client }
    }
}

fn confirmation_state(
    status: Option<solana_transaction_status::TransactionStatus>,
) -> ConfirmationState {
    let Some(status) = status else {
        return ConfirmationState::Unknown;
    };
    if let Some(err) = status.err {
        return ConfirmationState::Failed {
            error: err.to_string(),
        };
    }
    match status.confirmation_status() {
        TransactionConfirmationStatus::Processed => ConfirmationState::Processed,
        TransactionConfirmationStatus::Confirmed => ConfirmationState::Confirmed,
        TransactionConfirmationStatus::Finalized => ConfirmationState::Finalized,
    }
}

#[async_trait]
impl TransactionSubmitter for RpcSubmitter {
    async fn submit(&self, transaction: &VersionedTransaction) -> Result<TransactionId> {
        let config = RpcSendTransactionConfig {
            skip_preflight: false,
            preflight_commitment: Some(CommitmentLevel::Confirmed),
            encoding: Some(UiTransactionEncoding::Base64),
            ..RpcSendTransactionConfig::default()
        };

        info!("Sending transaction to the network");
        let signature = self
            .client
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| {
                error!("Failed to send transaction: {}", e);
                SwapError::SubmissionFailed(e.to_string())
            })?;

        info!("Transaction sent with signature: {}", signature);
        Ok(TransactionId(signature.to_string()))
    }

    async fn confirmation_status(&self, id: &TransactionId) -> Result<ConfirmationState> {
        let signature = Signature::from_str(id.as_str()).map_err(|e| {
            SwapError::SubmissionFailed(format!("invalid signature {}: {}", id, e))
        })?;

        let response = self
            .client
            .get_signature_statuses(&[signature])
            .await
            .map_err(|e| SwapError::SubmissionFailed(format!("status query failed: {}", e)))?;

        Ok(confirmation_state(response.value.into_iter().next().flatten()))
    }
}
