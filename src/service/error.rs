use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::RepositoryError;
use crate::swap::SwapError;

#[derive(Debug, Clone, Error, JsonSchema, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ServiceError {
    // Request validation errors
    /// The provided address is invalid or malformed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The token symbol is not in the registry.
    #[error("Token not found or not supported: {0}")]
    TokenNotFound(String),

    /// The token description is unusable (e.g., too many decimals).
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The requested amount is invalid (e.g., negative, zero, or malformed).
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The permit signature fields are malformed or expired.
    #[error("Invalid permit: {0}")]
    InvalidPermit(String),

    /// Slippage tolerance above 10000 basis points.
    #[error("Invalid slippage tolerance: {0} bps (maximum 10000)")]
    InvalidSlippage(u32),

    // Swap findings
    /// Input and output token are the same.
    #[error("No swap between similar tokens: {0}")]
    SameToken(String),

    /// The router has no path between the tokens.
    #[error("No route found from {token_in} to {token_out}")]
    NoRouteFound { token_in: String, token_out: String },

    /// The wallet holds less than the swap needs. Amounts are raw.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: String, available: String },

    /// The router may not spend enough; an approval is needed first. Amounts are raw.
    #[error("Insufficient allowance: required {required}, approved {available}")]
    InsufficientAllowance { required: String, available: String },

    /// The quoted route had no path or adapters to encode.
    #[error("Path or adapters unavailable")]
    PathUnavailable,

    /// Native currency cannot be approved.
    #[error("Native currency does not need an approval")]
    NativeApproval,

    // Infrastructure errors (abstracted from repository layer)
    /// An error occurred while communicating with the blockchain.
    #[error("Blockchain connection error: {0}")]
    BlockchainError(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RpcError(msg)
            | RepositoryError::ContractError(msg)
            | RepositoryError::ParseError(msg) => {
                ServiceError::BlockchainError(format!("Failed to interact with blockchain: {msg}"))
            }
            timeout @ RepositoryError::Timeout(_) => {
                ServiceError::BlockchainError(timeout.to_string())
            }
        }
    }
}

impl From<SwapError> for ServiceError {
    fn from(err: SwapError) -> Self {
        match err {
            SwapError::SameToken(address) => ServiceError::SameToken(address.to_checksum(None)),
            SwapError::NoRouteFound {
                token_in,
                token_out,
            } => ServiceError::NoRouteFound {
                token_in: token_in.to_checksum(None),
                token_out: token_out.to_checksum(None),
            },
            SwapError::InsufficientBalance {
                required,
                available,
            } => ServiceError::InsufficientBalance {
                required: required.to_string(),
                available: available.to_string(),
            },
            SwapError::InsufficientAllowance {
                required,
                available,
            } => ServiceError::InsufficientAllowance {
                required: required.to_string(),
                available: available.to_string(),
            },
            SwapError::PathUnavailable => ServiceError::PathUnavailable,
            SwapError::InvalidSlippage(bps) => ServiceError::InvalidSlippage(bps),
            err @ SwapError::UnsupportedDecimals { .. } => {
                ServiceError::InvalidToken(err.to_string())
            }
            SwapError::NativeApproval => ServiceError::NativeApproval,
            SwapError::Transport(e) => e.into(),
        }
    }
}
