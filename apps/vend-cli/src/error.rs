//! # Console Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Coin Vend                              │
//! │                                                                         │
//! │  > deposit 15p                                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  execute(Command)                                                │  │
//! │  │  Result<Reply, CliError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  CoreError::InvalidDenomination ──► CliError { INVALID_COIN } ──►│  │
//! │  │  ValidationError (bad number) ────► CliError { INVALID_INPUT } ─►│  │
//! │  │  CoreError::InternalConsistency ──► CliError { INTERNAL } ──────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Coin rejected - The '15p' coin has not been minted                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant except `Internal` is a user mistake: the loop prints it and
//! keeps going.

use serde::Serialize;
use vend_core::{CoreError, ValidationError};

use crate::config::ConfigError;

/// Error returned from console commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_FUNDS",
///   "message": "Insufficient funds: machine holds 700p, requested 1234567p"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message for the console
    pub message: String,
}

/// Error codes for console replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown coin name
    InvalidCoin,

    /// Machine cannot count another coin
    MachineFull,

    /// Malformed amount or argument
    InvalidInput,

    /// Machine holds less than requested
    InsufficientFunds,

    /// Greedy walk could not hit the amount
    CannotMakeChange,

    /// Negative change amount
    NegativeRequest,

    /// Config file or environment is unusable
    Config,

    /// Engine state can no longer be trusted
    Internal,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::InvalidInput, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    /// True when the machine must be restarted before taking more commands.
    pub fn is_fatal(&self) -> bool {
        self.code == ErrorCode::Internal
    }
}

/// Converts core errors to console errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidDenomination { .. } => {
                CliError::new(ErrorCode::InvalidCoin, format!("Coin rejected - {}", message))
            }
            CoreError::CapacityExceeded { .. } => CliError::new(ErrorCode::MachineFull, message),
            CoreError::InvalidInventorySpec(_) => CliError::new(ErrorCode::Config, message),
            CoreError::NegativeRequest { .. } => CliError::new(ErrorCode::NegativeRequest, message),
            CoreError::InsufficientFunds { .. } => {
                CliError::new(ErrorCode::InsufficientFunds, message)
            }
            CoreError::CannotMakeChange { .. } => CliError::new(ErrorCode::CannotMakeChange, message),
            CoreError::InternalConsistency { .. } => {
                tracing::error!(error = %message, "Internal consistency failure");
                CliError::internal(format!(
                    "{}. The machine must be re-initialised.",
                    message
                ))
            }
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::invalid_input(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::Config, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::internal(format!("Console I/O failed: {}", err))
    }
}
