use std::str::FromStr;

use alloy::primitives::{Address, B256, U256};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{Json, ServerHandler, tool, tool_handler, tool_router};
use tracing::instrument;

use crate::service::token_registry::TokenRegistry;
use crate::service::types::{
    BuildApproveRequest, BuildApproveResult, BuildSwapRequest, BuildSwapResult, PermitInput,
    QuoteAmountOutRequest, QuoteAmountOutResponse, QuoteAmountOutResult, QuoteUnitPriceRequest,
    QuoteUnitPriceResponse, QuoteUnitPriceResult, TokenInput, TransactionResponse,
};
use crate::service::utils::{MAX_DECIMALS, format_units, parse_amount};
use crate::service::{ServiceError, ServiceResult};
use crate::swap::{PermitSignature, SwapOrchestrator, Token};

pub struct RouterSwapService {
    tool_router: ToolRouter<Self>,
    orchestrator: SwapOrchestrator,
    token_registry: TokenRegistry,
}

// MCP Tool Layer
#[tool_router]
impl RouterSwapService {
    pub fn new(orchestrator: SwapOrchestrator, token_registry: TokenRegistry) -> Self {
        Self {
            tool_router: Self::tool_router(),
            orchestrator,
            token_registry,
        }
    }

    #[instrument(skip(self))]
    #[tool(description = "Price of one whole input token expressed in the output token")]
    pub async fn quote_unit_price(
        &self,
        Parameters(req): Parameters<QuoteUnitPriceRequest>,
    ) -> Json<QuoteUnitPriceResult> {
        match self.quote_unit_price_impl(req).await {
            Ok(response) => Json(QuoteUnitPriceResult::Success(response)),
            Err(e) => {
                tracing::error!("Failed to quote unit price: {e}");
                Json(QuoteUnitPriceResult::Error { error: e })
            }
        }
    }

    #[instrument(skip(self))]
    #[tool(description = "Quote the output and best route for swapping a given input amount")]
    pub async fn quote_amount_out(
        &self,
        Parameters(req): Parameters<QuoteAmountOutRequest>,
    ) -> Json<QuoteAmountOutResult> {
        match self.quote_amount_out_impl(req).await {
            Ok(response) => Json(QuoteAmountOutResult::Success(response)),
            Err(e) => {
                tracing::error!("Failed to quote amount out: {e}");
                Json(QuoteAmountOutResult::Error { error: e })
            }
        }
    }

    #[instrument(skip(self))]
    #[tool(
        description = "Build an unsigned router swap after checking route, balance and allowance. Nothing is signed or sent."
    )]
    pub async fn build_swap(
        &self,
        Parameters(req): Parameters<BuildSwapRequest>,
    ) -> Json<BuildSwapResult> {
        match self.build_swap_impl(req).await {
            Ok(response) => Json(BuildSwapResult::Success(response)),
            Err(e) => {
                tracing::error!("Failed to build swap: {e}");
                Json(BuildSwapResult::Error { error: e })
            }
        }
    }

    #[instrument(skip(self))]
    #[tool(
        description = "Build an unsigned approve (or EIP-2612 permit) letting the router spend a token"
    )]
    pub async fn build_approve(
        &self,
        Parameters(req): Parameters<BuildApproveRequest>,
    ) -> Json<BuildApproveResult> {
        match self.build_approve_impl(req) {
            Ok(response) => Json(BuildApproveResult::Success(response)),
            Err(e) => {
                tracing::error!("Failed to build approval: {e}");
                Json(BuildApproveResult::Error { error: e })
            }
        }
    }
}

// Business Logic - Core implementation
impl RouterSwapService {
    #[instrument(skip(self), err)]
    async fn quote_unit_price_impl(
        &self,
        req: QuoteUnitPriceRequest,
    ) -> ServiceResult<QuoteUnitPriceResponse> {
        let token_in = self.resolve_token(&req.token_in)?;
        let token_out = self.resolve_token(&req.token_out)?;

        let price = self
            .orchestrator
            .quote_unit_price(&token_in, &token_out)
            .await?;

        Ok(QuoteUnitPriceResponse {
            formatted_quote: format_units(price.quote, price.decimals),
            symbol: price.symbol,
            decimals: price.decimals,
            quote: price.quote.to_string(),
        })
    }

    #[instrument(skip(self), err)]
    async fn quote_amount_out_impl(
        &self,
        req: QuoteAmountOutRequest,
    ) -> ServiceResult<QuoteAmountOutResponse> {
        let token_in = self.resolve_token(&req.token_in)?;
        let token_out = self.resolve_token(&req.token_out)?;
        let amount_in = parse_positive_amount(&req.amount, &token_in)?;

        let quote = self
            .orchestrator
            .quote_amount_out(&token_in, &token_out, amount_in)
            .await?;

        Ok(QuoteAmountOutResponse::new(amount_in, &quote))
    }

    #[instrument(skip(self), err)]
    async fn build_swap_impl(&self, req: BuildSwapRequest) -> ServiceResult<TransactionResponse> {
        let token_in = self.resolve_token(&req.token_in)?;
        let token_out = self.resolve_token(&req.token_out)?;
        let amount_in = parse_positive_amount(&req.amount, &token_in)?;
        let user = parse_address(&req.user_address)?;

        tracing::info!(
            "Building swap of {} {} to {} for {}",
            req.amount,
            token_in.symbol,
            token_out.symbol,
            user
        );

        let tx = self
            .orchestrator
            .build_swap(&token_in, &token_out, amount_in, user, req.slippage_bps)
            .await?;

        Ok(tx.into())
    }

    #[instrument(skip(self), err)]
    fn build_approve_impl(&self, req: BuildApproveRequest) -> ServiceResult<TransactionResponse> {
        let token = self.resolve_token(&req.token)?;
        let amount = parse_amount(&req.amount, token.decimals)?;
        let user = parse_address(&req.user_address)?;

        let tx = match req.permit {
            Some(permit) => {
                let signature = parse_permit(&permit)?;
                self.orchestrator
                    .build_permit(&token, amount, user, signature)?
            }
            None => self.orchestrator.build_approve(&token, amount, user)?,
        };

        Ok(tx.into())
    }

    /// Resolves a registry symbol or an explicit token description.
    fn resolve_token(&self, input: &TokenInput) -> ServiceResult<Token> {
        match input {
            TokenInput::Symbol(symbol) => self.token_registry.lookup(symbol).cloned().ok_or_else(
                || {
                    ServiceError::TokenNotFound(format!(
                        "{symbol} (supported: {})",
                        self.token_registry.supported_tokens().join(", ")
                    ))
                },
            ),
            TokenInput::Custom {
                symbol,
                decimals,
                address,
            } => {
                if *decimals > MAX_DECIMALS {
                    return Err(ServiceError::InvalidToken(format!(
                        "{symbol} has {decimals} decimals, at most {MAX_DECIMALS} are supported"
                    )));
                }
                Ok(Token::new(symbol.clone(), *decimals, parse_address(address)?))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for RouterSwapService {}

fn parse_address(address: &str) -> ServiceResult<Address> {
    Address::from_str(address.trim())
        .map_err(|e| ServiceError::InvalidAddress(format!("{address}: {e}")))
}

/// Swaps and quotes of nothing are rejected before reaching the chain.
fn parse_positive_amount(amount: &str, token: &Token) -> ServiceResult<U256> {
    let raw = parse_amount(amount, token.decimals)?;
    if raw.is_zero() {
        return Err(ServiceError::InvalidAmount(format!(
            "{amount} {} is zero in base units",
            token.symbol
        )));
    }
    Ok(raw)
}

fn parse_permit(permit: &PermitInput) -> ServiceResult<PermitSignature> {
    let word = |value: &str| {
        B256::from_str(value.trim())
            .map_err(|e| ServiceError::InvalidPermit(format!("signature word {value}: {e}")))
    };

    let deadline = U256::from_str(permit.deadline.trim()).map_err(|e| {
        ServiceError::InvalidPermit(format!("deadline {}: {e}", permit.deadline))
    })?;
    let now = U256::from(chrono::Utc::now().timestamp().max(0) as u64);
    if deadline < now {
        return Err(ServiceError::InvalidPermit(format!(
            "deadline {deadline} has already passed"
        )));
    }

    Ok(PermitSignature {
        deadline,
        v: permit.v,
        r: word(&permit.r)?,
        s: word(&permit.s)?,
    })
}
