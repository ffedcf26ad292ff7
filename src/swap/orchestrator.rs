use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::instrument;

use super::address::{AddressNormalizer, assert_distinct_tokens};
use super::encoder::TransactionEncoder;
use super::error::SwapError;
use super::preflight::PreflightChecker;
use super::quoter::RouteQuoter;
use super::slippage::{minimum_amount_out, validate_slippage};
use super::types::{
    AmountQuote, PermitSignature, SwapVariant, Token, UnitPrice, UnsignedTransaction,
};
use crate::config::RouterSettings;
use crate::repository::ChainTransport;

/// Which side of the swap, if any, is the native currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapBranch {
    TokenToToken,
    NativeToToken,
    TokenToNative,
}

impl SwapBranch {
    /// Both sides native never reaches here; it is rejected as a same-token swap.
    pub fn classify(token_in: &Token, token_out: &Token) -> Self {
        if token_in.is_native() {
            SwapBranch::NativeToToken
        } else if token_out.is_native() {
            SwapBranch::TokenToNative
        } else {
            SwapBranch::TokenToToken
        }
    }

    pub fn variant(&self) -> SwapVariant {
        match self {
            SwapBranch::TokenToToken => SwapVariant::SwapNoSplit,
            SwapBranch::NativeToToken => SwapVariant::SwapNoSplitFromNative,
            SwapBranch::TokenToNative => SwapVariant::SwapNoSplitToNative,
        }
    }
}

/// Entry point of the swap pipeline: classify, preflight, validate, apply slippage, encode.
///
/// Holds one transport handle shared by every call; calls are otherwise independent and only
/// ever read from the chain.
#[derive(Clone)]
pub struct SwapOrchestrator {
    normalizer: AddressNormalizer,
    quoter: RouteQuoter,
    preflight: PreflightChecker,
    encoder: TransactionEncoder,
    default_slippage_bps: u32,
}

impl SwapOrchestrator {
    pub fn new(transport: Arc<dyn ChainTransport>, settings: &RouterSettings) -> Self {
        let normalizer = AddressNormalizer::new(settings.wrapped_native);
        let quoter = RouteQuoter::new(
            transport.clone(),
            settings.router,
            settings.max_hops,
            normalizer,
        );
        let preflight = PreflightChecker::new(transport, settings.router, quoter.clone(), normalizer);

        Self {
            normalizer,
            quoter,
            preflight,
            encoder: TransactionEncoder::new(settings.router, settings.fee),
            default_slippage_bps: settings.default_slippage_bps,
        }
    }

    pub fn default_slippage_bps(&self) -> u32 {
        self.default_slippage_bps
    }

    #[instrument(skip(self), err)]
    pub async fn quote_unit_price(
        &self,
        token_in: &Token,
        token_out: &Token,
    ) -> Result<UnitPrice, SwapError> {
        assert_distinct_tokens(token_in, token_out)?;
        self.normalizer.assert_routable(token_in, token_out)?;
        self.quoter.quote_unit_price(token_in, token_out).await
    }

    #[instrument(skip(self), err)]
    pub async fn quote_amount_out(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: U256,
    ) -> Result<AmountQuote, SwapError> {
        assert_distinct_tokens(token_in, token_out)?;
        self.normalizer.assert_routable(token_in, token_out)?;
        self.quoter
            .quote_amount_out(token_in, token_out, amount_in)
            .await
    }

    /// Builds an unsigned swap of `amount_in` for `user`.
    ///
    /// `slippage_bps` falls back to the configured default. Token and tolerance checks happen
    /// before any read; route, balance and allowance are checked in that order afterwards.
    #[instrument(skip(self), err)]
    pub async fn build_swap(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: U256,
        user: Address,
        slippage_bps: Option<u32>,
    ) -> Result<UnsignedTransaction, SwapError> {
        assert_distinct_tokens(token_in, token_out)?;
        self.normalizer.assert_routable(token_in, token_out)?;
        let tolerance = validate_slippage(slippage_bps.unwrap_or(self.default_slippage_bps))?;
        let branch = SwapBranch::classify(token_in, token_out);

        let snapshot = match branch {
            SwapBranch::NativeToToken => {
                self.preflight
                    .check_native(amount_in, token_in, token_out, user)
                    .await
            }
            SwapBranch::TokenToToken | SwapBranch::TokenToNative => {
                self.preflight
                    .check_token(amount_in, token_in, token_out, user)
                    .await?
            }
        };

        let quote = snapshot.validate(amount_in, token_in.address, token_out.address)?;
        let min_amount_out = minimum_amount_out(&quote, tolerance);

        tracing::info!(
            "Building {} swap {} {} -> {} for {}: quoted {:?}, minimum {} at {} bps",
            branch.variant(),
            amount_in,
            token_in.symbol,
            token_out.symbol,
            user,
            quote.amount_out(),
            min_amount_out,
            tolerance
        );

        let value = (branch == SwapBranch::NativeToToken).then_some(amount_in);
        self.encoder.build_call_data(
            branch.variant(),
            amount_in,
            min_amount_out,
            &quote.path,
            &quote.adapters,
            user,
            value,
        )
    }

    /// Approval letting the router spend `amount` of `token` for `user`.
    pub fn build_approve(
        &self,
        token: &Token,
        amount: U256,
        user: Address,
    ) -> Result<UnsignedTransaction, SwapError> {
        self.encoder.build_approve(token, amount, user)
    }

    pub fn build_permit(
        &self,
        token: &Token,
        amount: U256,
        user: Address,
        signature: PermitSignature,
    ) -> Result<UnsignedTransaction, SwapError> {
        self.encoder.build_permit(token, amount, user, signature)
    }
}
