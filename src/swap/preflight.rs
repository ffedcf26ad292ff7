use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::instrument;

use super::address::AddressNormalizer;
use super::error::SwapError;
use super::quoter::{RouteQuoter, decode_quote, require_route};
use super::types::{PreflightSnapshot, RouteQuote, Token};
use crate::repository::contract::IERC20;
use crate::repository::{ChainTransport, ReadCall, ReadOutcome, RepositoryError};

/// Reads route, balance and allowance for a swap in one round trip.
///
/// Findings such as "no route" or "balance too low" are recorded in the snapshot, never
/// returned as errors; [`PreflightSnapshot::validate`] turns them into errors in a fixed order.
#[derive(Clone)]
pub struct PreflightChecker {
    transport: Arc<dyn ChainTransport>,
    router: Address,
    quoter: RouteQuoter,
    normalizer: AddressNormalizer,
}

impl PreflightChecker {
    pub fn new(
        transport: Arc<dyn ChainTransport>,
        router: Address,
        quoter: RouteQuoter,
        normalizer: AddressNormalizer,
    ) -> Self {
        Self {
            transport,
            router,
            quoter,
            normalizer,
        }
    }

    /// Preflight for an ERC20 input: quote, `balanceOf` and `allowance` in one batch.
    ///
    /// Fails only when the batch itself cannot be executed.
    #[instrument(skip(self), err)]
    pub async fn check_token(
        &self,
        amount_in: U256,
        token_in: &Token,
        token_out: &Token,
        user: Address,
    ) -> Result<PreflightSnapshot, SwapError> {
        let calls = vec![
            self.quoter.find_best_path_call(
                amount_in,
                token_in.address,
                self.normalizer.to_queryable_address(token_out.address),
            ),
            ReadCall::new(token_in.address, &IERC20::balanceOfCall { account: user }),
            ReadCall::new(
                token_in.address,
                &IERC20::allowanceCall {
                    owner: user,
                    spender: self.router,
                },
            ),
        ];

        let outcomes = self.transport.read_batch(calls).await?;
        let [quote, balance, allowance] = <[ReadOutcome; 3]>::try_from(outcomes)
            .map_err(|outcomes| {
                RepositoryError::ParseError(format!(
                    "Expected 3 preflight results, got {}",
                    outcomes.len()
                ))
            })?;

        let snapshot = PreflightSnapshot {
            quote: decode_quote(&quote),
            balance: balance.decode::<IERC20::balanceOfCall>(),
            allowance: Some(allowance.decode::<IERC20::allowanceCall>()),
        };
        tracing::debug!("Token preflight snapshot: {:?}", snapshot);
        Ok(snapshot)
    }

    /// Preflight for a native input: quote and native balance, issued concurrently.
    ///
    /// The two reads are independent; a failure of one is kept in the snapshot next to the
    /// result of the other.
    #[instrument(skip(self))]
    pub async fn check_native(
        &self,
        amount_in: U256,
        token_in: &Token,
        token_out: &Token,
        user: Address,
    ) -> PreflightSnapshot {
        let quote_call = self.quoter.find_best_path_call(
            amount_in,
            self.normalizer.to_queryable_address(token_in.address),
            token_out.address,
        );

        let (quote, balance) = tokio::join!(
            self.transport.read_one(quote_call),
            self.transport.native_balance(user)
        );

        if let Err(e) = &quote {
            tracing::warn!("Native preflight quote failed: {e}");
        }
        if let Err(e) = &balance {
            tracing::warn!("Native preflight balance failed: {e}");
        }

        PreflightSnapshot {
            quote: quote.and_then(|outcome| decode_quote(&outcome)),
            balance,
            allowance: None,
        }
    }
}

impl PreflightSnapshot {
    /// Checks, in order: a route exists, balance covers `amount_in`, and for ERC20 input the
    /// allowance covers `amount_in`. The first failing check wins.
    pub fn validate(
        &self,
        amount_in: U256,
        token_in: Address,
        token_out: Address,
    ) -> Result<RouteQuote, SwapError> {
        let quote = require_route(self.quote.clone(), token_in, token_out)?;

        let balance = self.balance.clone()?;
        if balance < amount_in {
            return Err(SwapError::InsufficientBalance {
                required: amount_in,
                available: balance,
            });
        }

        if let Some(allowance) = &self.allowance {
            let allowance = allowance.clone()?;
            if allowance < amount_in {
                return Err(SwapError::InsufficientAllowance {
                    required: amount_in,
                    available: allowance,
                });
            }
        }

        Ok(quote)
    }
}
