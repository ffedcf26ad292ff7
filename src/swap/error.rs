use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::repository::RepositoryError;

#[derive(Debug, Clone, Error)]
pub enum SwapError {
    /// Input and output token share an address.
    #[error("No swap between similar tokens: {0}")]
    SameToken(Address),

    /// The router found no path between the tokens for the requested amount.
    #[error("No route found from {token_in} to {token_out}")]
    NoRouteFound { token_in: Address, token_out: Address },

    /// The user holds less of the input token than the swap needs.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },

    /// The router may not spend enough of the user's input token.
    #[error("Insufficient allowance: required {required}, approved {available}")]
    InsufficientAllowance { required: U256, available: U256 },

    /// A route reached the encoder without a path or adapters.
    #[error("Path or adapters unavailable")]
    PathUnavailable,

    /// Slippage tolerance outside 0..=10000 basis points.
    #[error("Invalid slippage tolerance: {0} bps (maximum 10000)")]
    InvalidSlippage(u32),

    /// One whole unit of the token does not fit in 256 bits.
    #[error("Unsupported decimals for {symbol}: {decimals}")]
    UnsupportedDecimals { symbol: String, decimals: u8 },

    /// Native currency has no allowance to grant.
    #[error("Native currency does not need an approval")]
    NativeApproval,

    /// The read itself failed: node unreachable, malformed response or timeout.
    #[error("Transport error: {0}")]
    Transport(#[from] RepositoryError),
}

/// Fieldless discriminant of [`SwapError`] for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapErrorKind {
    SameToken,
    NoRouteFound,
    InsufficientBalance,
    InsufficientAllowance,
    PathUnavailable,
    InvalidSlippage,
    UnsupportedDecimals,
    NativeApproval,
    Transport,
}

impl SwapError {
    pub fn kind(&self) -> SwapErrorKind {
        match self {
            SwapError::SameToken(_) => SwapErrorKind::SameToken,
            SwapError::NoRouteFound { .. } => SwapErrorKind::NoRouteFound,
            SwapError::InsufficientBalance { .. } => SwapErrorKind::InsufficientBalance,
            SwapError::InsufficientAllowance { .. } => SwapErrorKind::InsufficientAllowance,
            SwapError::PathUnavailable => SwapErrorKind::PathUnavailable,
            SwapError::InvalidSlippage(_) => SwapErrorKind::InvalidSlippage,
            SwapError::UnsupportedDecimals { .. } => SwapErrorKind::UnsupportedDecimals,
            SwapError::NativeApproval => SwapErrorKind::NativeApproval,
            SwapError::Transport(_) => SwapErrorKind::Transport,
        }
    }
}
