use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::instrument;

use super::address::AddressNormalizer;
use super::error::SwapError;
use super::types::{AmountQuote, ReadResult, RouteQuote, Token, UnitPrice};
use crate::repository::contract::ISwapRouter;
use crate::repository::{ChainTransport, ReadCall, ReadOutcome, RepositoryError};

/// Hop cap passed to path discovery. The router accepts 2..=5.
pub const DEFAULT_MAX_HOPS: u32 = 4;

/// Asks the router's path finder for the best route.
#[derive(Clone)]
pub struct RouteQuoter {
    transport: Arc<dyn ChainTransport>,
    router: Address,
    max_hops: u32,
    normalizer: AddressNormalizer,
}

impl RouteQuoter {
    pub fn new(
        transport: Arc<dyn ChainTransport>,
        router: Address,
        max_hops: u32,
        normalizer: AddressNormalizer,
    ) -> Self {
        Self {
            transport,
            router,
            max_hops,
            normalizer,
        }
    }

    /// Builds the `findBestPath` read. Addresses must already be normalized.
    pub fn find_best_path_call(
        &self,
        amount_in: U256,
        token_in: Address,
        token_out: Address,
    ) -> ReadCall {
        ReadCall::new(
            self.router,
            &ISwapRouter::findBestPathCall {
                _amountIn: amount_in,
                _tokenIn: token_in,
                _tokenOut: token_out,
                _maxSteps: U256::from(self.max_hops),
            },
        )
    }

    /// Quotes `amount_in` along the best path. Native sides must already be normalized.
    #[instrument(skip(self), err)]
    pub async fn quote_path(
        &self,
        amount_in: U256,
        token_in: Address,
        token_out: Address,
    ) -> Result<RouteQuote, SwapError> {
        let call = self.find_best_path_call(amount_in, token_in, token_out);
        let outcome = self.transport.read_one(call).await?;

        let quote = require_route(decode_quote(&outcome), token_in, token_out)?;
        tracing::debug!(
            "Quoted {} -> {}: {} hops, amount out {:?}",
            token_in,
            token_out,
            quote.hops(),
            quote.amount_out()
        );
        Ok(quote)
    }

    /// Price of one whole `token_in` in `token_out`.
    #[instrument(skip(self), err)]
    pub async fn quote_unit_price(
        &self,
        token_in: &Token,
        token_out: &Token,
    ) -> Result<UnitPrice, SwapError> {
        let quote = self
            .quote_path(
                unit_of(token_in)?,
                self.normalizer.to_queryable_address(token_in.address),
                self.normalizer.to_queryable_address(token_out.address),
            )
            .await?;

        Ok(UnitPrice {
            symbol: token_out.symbol.clone(),
            decimals: token_out.decimals,
            quote: quote.amount_out().unwrap_or_default(),
        })
    }

    /// Unit price and the output for `amount_in`, read in a single batch.
    #[instrument(skip(self), err)]
    pub async fn quote_amount_out(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: U256,
    ) -> Result<AmountQuote, SwapError> {
        let query_in = self.normalizer.to_queryable_address(token_in.address);
        let query_out = self.normalizer.to_queryable_address(token_out.address);

        let calls = vec![
            self.find_best_path_call(unit_of(token_in)?, query_in, query_out),
            self.find_best_path_call(amount_in, query_in, query_out),
        ];
        let outcomes = self.transport.read_batch(calls).await?;
        let [unit_outcome, amount_outcome] = <[ReadOutcome; 2]>::try_from(outcomes)
            .map_err(|outcomes| {
                RepositoryError::ParseError(format!(
                    "Expected 2 quote results, got {}",
                    outcomes.len()
                ))
            })?;

        let unit = require_route(decode_quote(&unit_outcome), query_in, query_out)?;
        let route = require_route(decode_quote(&amount_outcome), query_in, query_out)?;

        Ok(AmountQuote {
            symbol: token_out.symbol.clone(),
            decimals: token_out.decimals,
            unit_quote: unit.amount_out().unwrap_or_default(),
            amount_out: route.amount_out().unwrap_or_default(),
            route,
        })
    }
}

/// Probe amount for price discovery: one whole `token`.
fn unit_of(token: &Token) -> Result<U256, SwapError> {
    token.unit().ok_or_else(|| SwapError::UnsupportedDecimals {
        symbol: token.symbol.clone(),
        decimals: token.decimals,
    })
}

/// Decodes a `findBestPath` outcome without judging whether a route was found.
pub(crate) fn decode_quote(outcome: &ReadOutcome) -> ReadResult<RouteQuote> {
    outcome
        .decode::<ISwapRouter::findBestPathCall>()
        .map(RouteQuote::from)
}

/// Turns a decoded quote into a usable route or the matching error.
///
/// A reverted path lookup counts as "no route"; anything else that failed is a transport
/// failure.
pub(crate) fn require_route(
    quote: ReadResult<RouteQuote>,
    token_in: Address,
    token_out: Address,
) -> Result<RouteQuote, SwapError> {
    match quote {
        Ok(quote) if quote.has_route() => Ok(quote),
        Ok(_) | Err(RepositoryError::ContractError(_)) => {
            tracing::info!("No route found from {} to {}", token_in, token_out);
            Err(SwapError::NoRouteFound {
                token_in,
                token_out,
            })
        }
        Err(e) => Err(SwapError::Transport(e)),
    }
}
