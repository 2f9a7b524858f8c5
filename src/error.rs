//! Error types for the swap execution engine

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Every failure a swap can end in. Each variant carries the upstream
/// diagnostic text; use [`SwapError::display_message`] for anything shown
/// to an operator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("Invalid wallet credential: {0}")]
    InvalidCredential(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("Swap build failed: {0}")]
    SwapBuildFailed(String),

    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),
}

/// Fieldless mirror of [`SwapError`] for matching and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapErrorKind {
    NotReady,
    InvalidCredential,
    InvalidAmount,
    QuoteUnavailable,
    SwapBuildFailed,
    MalformedTransaction,
    SubmissionFailed,
}

impl fmt::Display for SwapErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapErrorKind::NotReady => "not_ready",
            SwapErrorKind::InvalidCredential => "invalid_credential",
            SwapErrorKind::InvalidAmount => "invalid_amount",
            SwapErrorKind::QuoteUnavailable => "quote_unavailable",
            SwapErrorKind::SwapBuildFailed => "swap_build_failed",
            SwapErrorKind::MalformedTransaction => "malformed_transaction",
            SwapErrorKind::SubmissionFailed => "submission_failed",
        };
        f.write_str(name)
    }
}

impl SwapError {
    pub fn kind(&self) -> SwapErrorKind {
        match self {
            SwapError::NotReady(_) => SwapErrorKind::NotReady,
            SwapError::InvalidCredential(_) => SwapErrorKind::InvalidCredential,
            SwapError::InvalidAmount(_) => SwapErrorKind::InvalidAmount,
            SwapError::QuoteUnavailable(_) => SwapErrorKind::QuoteUnavailable,
            SwapError::SwapBuildFailed(_) => SwapErrorKind::SwapBuildFailed,
            SwapError::MalformedTransaction(_) => SwapErrorKind::MalformedTransaction,
            SwapError::SubmissionFailed(_) => SwapErrorKind::SubmissionFailed,
        }
    }

    /// The raw diagnostic text, without the kind prefix.
    pub fn diagnostic(&self) -> &str {
        match self {
            SwapError::NotReady(msg)
            | SwapError::InvalidCredential(msg)
            | SwapError::InvalidAmount(msg)
            | SwapError::QuoteUnavailable(msg)
            | SwapError::SwapBuildFailed(msg)
            | SwapError::MalformedTransaction(msg)
            | SwapError::SubmissionFailed(msg) => msg,
        }
    }

    /// Diagnostic cut to at most `max_chars` characters.
    pub fn display_message(&self, max_chars: usize) -> String {
        crate::utils::truncate_chars(self.diagnostic(), max_chars)
    }
}

pub type Result<T> = std::result::Result<T, SwapError>;
