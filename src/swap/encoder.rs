use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use super::error::SwapError;
use super::types::{SwapVariant, UnsignedTransaction};
use crate::repository::contract::ISwapRouter;

/// Router fee passed with every swap, in the router's fee units.
pub const ROUTER_FEE: u64 = 30;

/// Builds unsigned calls against the router and the tokens it spends.
#[derive(Debug, Clone, Copy)]
pub struct TransactionEncoder {
    router: Address,
    fee: U256,
}

impl TransactionEncoder {
    pub fn new(router: Address, fee: U256) -> Self {
        Self { router, fee }
    }

    pub fn router(&self) -> Address {
        self.router
    }

    /// Encodes one of the `swapNoSplit*` entry points.
    ///
    /// `value` defaults to zero; only the from-native variant should carry one.
    #[allow(clippy::too_many_arguments)]
    pub fn build_call_data(
        &self,
        variant: SwapVariant,
        amount_in: U256,
        min_amount_out: U256,
        path: &[Address],
        adapters: &[Address],
        user: Address,
        value: Option<U256>,
    ) -> Result<UnsignedTransaction, SwapError> {
        if path.is_empty() || adapters.is_empty() {
            return Err(SwapError::PathUnavailable);
        }

        let trade = ISwapRouter::Trade {
            amountIn: amount_in,
            amountOut: min_amount_out,
            path: path.to_vec(),
            adapters: adapters.to_vec(),
        };

        let data = match variant {
            SwapVariant::SwapNoSplit => ISwapRouter::swapNoSplitCall {
                _trade: trade,
                _to: user,
                _fee: self.fee,
            }
            .abi_encode(),
            SwapVariant::SwapNoSplitFromNative => ISwapRouter::swapNoSplitFromNativeCall {
                _trade: trade,
                _to: user,
                _fee: self.fee,
            }
            .abi_encode(),
            SwapVariant::SwapNoSplitToNative => ISwapRouter::swapNoSplitToNativeCall {
                _trade: trade,
                _to: user,
                _fee: self.fee,
            }
            .abi_encode(),
        };

        tracing::debug!(
            "Encoded {} for {}: amount in {}, min out {}, {} hops",
            variant,
            user,
            amount_in,
            min_amount_out,
            path.len().saturating_sub(1)
        );

        Ok(UnsignedTransaction {
            to: self.router,
            data: Bytes::from(data),
            value: value.unwrap_or_default(),
            from: user,
        })
    }
}
