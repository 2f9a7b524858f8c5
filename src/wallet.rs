//! Wallet credential store
//!
//! The keypair is the only copy of the signing key in the process. It never
//! leaves this module: callers get the public key and a signing operation.

use crate::error::{Result, SwapError};
use secrecy::{ExposeSecret, SecretString};
use solana_sdk::{
    message::VersionedMessage,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    signer::{keypair::keypair_from_seed, SignerError},
    transaction::VersionedTransaction,
};
use tracing::info;

const KEYPAIR_LENGTH: usize = 64;
const SEED_LENGTH: usize = 32;

pub struct WalletIdentity {
    keypair: Keypair,
    pubkey: Pubkey,
}

impl WalletIdentity {
    /// Import a wallet from a base-58 encoded 64-byte keypair.
    pub fn from_base58(secret: &SecretString) -> Result<Self> {
        let bytes = bs58::decode(secret.expose_secret().trim())
            .into_vec()
            .map_err(|e| SwapError::InvalidCredential(format!("not valid base-58: {}", e)))?;

        if bytes.len() != KEYPAIR_LENGTH {
            return Err(SwapError::InvalidCredential(format!(
                "expected {} key bytes, got {}",
                KEYPAIR_LENGTH,
                bytes.len()
            )));
        }

        // Rebuild from the seed; the stored public half must match it
        let keypair = keypair_from_seed(&bytes[..SEED_LENGTH])
            .map_err(|_| SwapError::InvalidCredential("not a valid ed25519 keypair".to_string()))?;
        if keypair.pubkey().to_bytes()[..] != bytes[SEED_LENGTH..] {
            return Err(SwapError::InvalidCredential(
                "public key does not match secret key".to_string(),
            ));
        }

        Ok(Self::from_keypair(keypair))
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        let pubkey = keypair.pubkey();
        Self { keypair, pubkey }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    /// Sign `message` as its sole required signer.
    pub fn sign_message(
        &self,
        message: VersionedMessage,
    ) -> std::result::Result<VersionedTransaction, SignerError> {
        VersionedTransaction::try_new(message, &[&self.keypair])
    }
}

impl std::fmt::Debug for WalletIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletIdentity")
            .field("pubkey", &self.pubkey)
            .field("keypair", &"[REDACTED]")
            .finish()
    }
}

/// Load the wallet from the configured secret, if any.
///
/// `Ok(None)` means no secret was configured; swaps will be refused.
pub fn load(secret: Option<&SecretString>) -> Result<Option<WalletIdentity>> {
    let Some(secret) = secret else {
        return Ok(None);
    };
    let wallet = WalletIdentity::from_base58(secret)?;
    info!("Wallet loaded: {}", wallet.pubkey());
    Ok(Some(wallet))
}
