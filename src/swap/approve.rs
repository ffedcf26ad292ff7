//! Allowance transactions for the router.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use super::encoder::TransactionEncoder;
use super::error::SwapError;
use super::types::{PermitSignature, Token, UnsignedTransaction};
use crate::repository::contract::IERC20;

impl TransactionEncoder {
    /// `approve(router, amount)` on `token`, sent from `user`.
    pub fn build_approve(
        &self,
        token: &Token,
        amount: U256,
        user: Address,
    ) -> Result<UnsignedTransaction, SwapError> {
        if token.is_native() {
            return Err(SwapError::NativeApproval);
        }

        let data = IERC20::approveCall {
            spender: self.router(),
            amount,
        }
        .abi_encode();

        tracing::debug!(
            "Encoded approve of {} {} to router {} for {}",
            amount,
            token.symbol,
            self.router(),
            user
        );

        Ok(UnsignedTransaction {
            to: token.address,
            data: Bytes::from(data),
            value: U256::ZERO,
            from: user,
        })
    }

    /// EIP-2612 `permit(user, router, amount, ...)` on `token`.
    ///
    /// The signature is produced elsewhere; the permit can be submitted by anyone, so `from` is
    /// only a suggestion.
    pub fn build_permit(
        &self,
        token: &Token,
        amount: U256,
        user: Address,
        signature: PermitSignature,
    ) -> Result<UnsignedTransaction, SwapError> {
        if token.is_native() {
            return Err(SwapError::NativeApproval);
        }

        let data = IERC20::permitCall {
            owner: user,
            spender: self.router(),
            value: amount,
            deadline: signature.deadline,
            v: signature.v,
            r: signature.r,
            s: signature.s,
        }
        .abi_encode();

        Ok(UnsignedTransaction {
            to: token.address,
            data: Bytes::from(data),
            value: U256::ZERO,
            from: user,
        })
    }
}
