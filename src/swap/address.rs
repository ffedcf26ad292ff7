//! Native currency handling and token pair sanity checks.

use alloy::primitives::Address;

use super::error::SwapError;
use super::types::{NATIVE_SENTINEL, Token};

/// Whether `address` is the native currency sentinel.
///
/// Addresses are compared as bytes, so the hex casing they were parsed from never matters.
pub fn is_native_sentinel(address: Address) -> bool {
    address == NATIVE_SENTINEL
}

/// Rejects a swap whose input and output are the same token.
///
/// Must run before any network call.
pub fn assert_distinct_tokens(token_in: &Token, token_out: &Token) -> Result<(), SwapError> {
    if token_in.address == token_out.address {
        tracing::warn!(
            "Rejected swap between similar tokens {} and {} ({})",
            token_in.symbol,
            token_out.symbol,
            token_in.address
        );
        return Err(SwapError::SameToken(token_in.address));
    }
    Ok(())
}

/// Maps the native sentinel onto the wrapped-native ERC20 for calls that need a real contract.
#[derive(Debug, Clone, Copy)]
pub struct AddressNormalizer {
    wrapped_native: Address,
}

impl AddressNormalizer {
    pub fn new(wrapped_native: Address) -> Self {
        Self { wrapped_native }
    }

    pub fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    pub fn to_queryable_address(&self, address: Address) -> Address {
        if is_native_sentinel(address) {
            self.wrapped_native
        } else {
            address
        }
    }

    /// Rejects a pair that collapses onto one contract once native is mapped to wrapped
    /// native. Wrapping and unwrapping are not router swaps, so no path lookup is sent.
    pub fn assert_routable(&self, token_in: &Token, token_out: &Token) -> Result<(), SwapError> {
        let query_in = self.to_queryable_address(token_in.address);
        if query_in == self.to_queryable_address(token_out.address) {
            tracing::info!(
                "No route between {} and {}: both resolve to {}",
                token_in.symbol,
                token_out.symbol,
                query_in
            );
            return Err(SwapError::NoRouteFound {
                token_in: token_in.address,
                token_out: token_out.address,
            });
        }
        Ok(())
    }
}
