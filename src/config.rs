//! Persisted trading configuration
//!
//! The file lives at `config/trading.json` unless `SWAP_CONFIG_FILE` says
//! otherwise. A missing file is created with defaults on first run.

use crate::models::{SwapPair, TokenInfo, USDC_DECIMALS, USDC_MINT};
use crate::utils;
use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "config/trading.json";
const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
const DEFAULT_JUPITER_API_URL: &str = "https://quote-api.jup.ag/v6";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_MESSAGE_LEN: usize = 100;

/// Path of the config file, from `SWAP_CONFIG_FILE` or the default.
pub fn config_path() -> PathBuf {
    std::env::var("SWAP_CONFIG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

// A token as written in the config file
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TokenConfig {
    pub symbol: String,
    pub mint: String,
    pub decimals: u8,
}

impl TokenConfig {
    fn sol() -> Self {
        let sol = TokenInfo::sol();
        Self {
            symbol: sol.symbol,
            mint: sol.mint.to_string(),
            decimals: sol.decimals,
        }
    }

    fn usdc() -> Self {
        Self {
            symbol: "USDC".to_string(),
            mint: USDC_MINT.to_string(),
            decimals: USDC_DECIMALS,
        }
    }

    fn resolve(&self) -> Result<TokenInfo> {
        let mint = Pubkey::from_str(&self.mint)
            .map_err(|e| anyhow!("Invalid mint for {}: {}", self.symbol, e))?;
        Ok(TokenInfo {
            symbol: self.symbol.clone(),
            mint,
            decimals: self.decimals,
        })
    }
}

/// On-disk layout. Only `rpc`, `slippage` and `wallet_private_key` are
/// written by older deployments; everything else falls back to defaults.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub rpc: String,
    /// Percent, e.g. `0.5` for 0.5%.
    pub slippage: Decimal,
    #[serde(default)]
    pub wallet_private_key: String,
    #[serde(default = "default_jupiter_api_url")]
    pub jupiter_api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
    #[serde(default = "default_true")]
    pub wrap_and_unwrap_sol: bool,
    #[serde(default = "default_buy_presets")]
    pub buy_presets: Vec<Decimal>,
    #[serde(default = "TokenConfig::sol")]
    pub input_token: TokenConfig,
    #[serde(default = "TokenConfig::usdc")]
    pub output_token: TokenConfig,
}

fn default_jupiter_api_url() -> String {
    DEFAULT_JUPITER_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_message_len() -> usize {
    DEFAULT_MAX_MESSAGE_LEN
}

fn default_true() -> bool {
    true
}

fn default_buy_presets() -> Vec<Decimal> {
    vec![Decimal::new(1, 2), Decimal::new(5, 2)]
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            rpc: DEFAULT_RPC_URL.to_string(),
            slippage: Decimal::new(5, 1),
            wallet_private_key: String::new(),
            jupiter_api_url: default_jupiter_api_url(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            wrap_and_unwrap_sol: true,
            buy_presets: default_buy_presets(),
            input_token: TokenConfig::sol(),
            output_token: TokenConfig::usdc(),
        }
    }
}

// Keeps the private key out of logs
impl std::fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigFile")
            .field("rpc", &self.rpc)
            .field("slippage", &self.slippage)
            .field("wallet_private_key", &"[REDACTED]")
            .field("jupiter_api_url", &self.jupiter_api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_message_len", &self.max_message_len)
            .finish()
    }
}

/// Validated configuration, ready to wire the engine from.
#[derive(Debug)]
pub struct Config {
    pub rpc_url: Url,
    pub slippage_bps: u16,
    pub wallet_secret: Option<SecretString>,
    pub jupiter_api_url: Url,
    pub request_timeout: Duration,
    pub max_message_len: usize,
    pub wrap_and_unwrap_sol: bool,
    pub buy_presets: Vec<Decimal>,
    pub pair: SwapPair,
}

impl Config {
    /// Load the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            write_default(path)?;
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Self::from_file(file)
    }

    pub fn from_file(file: ConfigFile) -> Result<Self> {
        if file.slippage < Decimal::ZERO || file.slippage > Decimal::ONE_HUNDRED {
            return Err(anyhow!(
                "Slippage must be between 0 and 100 percent, got {}",
                file.slippage
            ));
        }
        let slippage_bps = utils::percent_to_bps(file.slippage)
            .ok_or_else(|| anyhow!("Slippage {} cannot be expressed in basis points", file.slippage))?;

        let rpc_url = Url::parse(&file.rpc).context("Invalid rpc URL")?;
        let jupiter_api_url =
            Url::parse(&file.jupiter_api_url).context("Invalid jupiter_api_url")?;

        if file.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than zero"));
        }
        if file.buy_presets.iter().any(|p| *p <= Decimal::ZERO) {
            return Err(anyhow!("buy_presets must all be greater than zero"));
        }

        let pair = SwapPair {
            input: file.input_token.resolve()?,
            output: file.output_token.resolve()?,
        };

        let wallet_secret = match file.wallet_private_key.trim() {
            "" => None,
            secret => Some(SecretString::new(secret.to_string())),
        };

        Ok(Self {
            rpc_url,
            slippage_bps,
            wallet_secret,
            jupiter_api_url,
            request_timeout: Duration::from_secs(file.request_timeout_secs),
            max_message_len: file.max_message_len,
            wrap_and_unwrap_sol: file.wrap_and_unwrap_sol,
            buy_presets: file.buy_presets,
            pair,
        })
    }
}

fn write_default(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let body = serde_json::to_string_pretty(&ConfigFile::default())?;
    fs::write(path, body)
        .with_context(|| format!("Failed to write default config {}", path.display()))?;
    info!("Wrote default config to {}", path.display());
    Ok(())
}
