use alloy::primitives::{Address, U256};
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::service::ServiceError;
use crate::service::utils::format_units;
use crate::swap::{AmountQuote, RouteQuote, UnsignedTransaction};

// Response types that include error handling
#[derive(Debug, JsonSchema, Serialize)]
#[serde(untagged)]
pub enum QuoteUnitPriceResult {
    Success(QuoteUnitPriceResponse),
    Error { error: ServiceError },
}

#[derive(Debug, JsonSchema, Serialize)]
#[serde(untagged)]
pub enum QuoteAmountOutResult {
    Success(QuoteAmountOutResponse),
    Error { error: ServiceError },
}

#[derive(Debug, JsonSchema, Serialize)]
#[serde(untagged)]
pub enum BuildSwapResult {
    Success(TransactionResponse),
    Error { error: ServiceError },
}

#[derive(Debug, JsonSchema, Serialize)]
#[serde(untagged)]
pub enum BuildApproveResult {
    Success(TransactionResponse),
    Error { error: ServiceError },
}

/// A token, either by registry symbol or spelled out.
#[derive(Debug, Clone, JsonSchema, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenInput {
    /// Registry symbol (e.g., "MON", "WMON", "USDC")
    Symbol(String),
    /// Any ERC20; "0x0000000000000000000000000000000000000000" stands for the native currency
    Custom {
        symbol: String,
        decimals: u8,
        address: String,
    },
}

impl TokenInput {
    pub fn symbol(symbol: impl ToString) -> Self {
        Self::Symbol(symbol.to_string())
    }
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct QuoteUnitPriceRequest {
    /// Token being priced
    pub token_in: TokenInput,
    /// Token the price is expressed in
    pub token_out: TokenInput,
}

#[derive(Debug, JsonSchema, Serialize)]
pub struct QuoteUnitPriceResponse {
    /// Symbol of the quote token
    pub symbol: String,
    /// Decimals of the quote token
    pub decimals: u8,
    /// Output for one whole input token, in the quote token's smallest unit
    pub quote: String,
    /// Quote formatted with the quote token's decimals
    pub formatted_quote: String,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct QuoteAmountOutRequest {
    pub token_in: TokenInput,
    pub token_out: TokenInput,
    /// Amount of `token_in` in human-readable format (e.g., "1.3")
    pub amount: String,
}

#[derive(Debug, JsonSchema, Serialize)]
pub struct QuoteAmountOutResponse {
    pub symbol: String,
    pub decimals: u8,
    /// Input amount in the input token's smallest unit
    pub amount_in: String,
    /// Output for one whole input token (raw)
    pub unit_quote: String,
    pub formatted_unit_quote: String,
    /// Output for `amount_in` (raw)
    pub amount_out: String,
    pub formatted_amount_out: String,
    pub route: RouteResponse,
}

#[derive(Debug, JsonSchema, Serialize)]
pub struct RouteResponse {
    /// Token addresses from input to output
    pub path: Vec<String>,
    /// One adapter per hop
    pub adapters: Vec<String>,
    /// Amount at every step of the path (raw)
    pub amounts: Vec<String>,
    pub gas_estimate: String,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct BuildSwapRequest {
    pub token_in: TokenInput,
    pub token_out: TokenInput,
    /// Amount of `token_in` in human-readable format (e.g., "1.3" for 1.3 MON)
    pub amount: String,
    /// Address that sends the transaction and receives the output
    pub user_address: String,
    /// Optional: slippage tolerance in basis points (100 = 1%, defaults to 100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<u32>,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct BuildApproveRequest {
    /// Token the router should be allowed to spend
    pub token: TokenInput,
    /// Allowance in human-readable format
    pub amount: String,
    /// Token holder
    pub user_address: String,
    /// Optional: EIP-2612 signature; when present a `permit` call is built instead of `approve`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permit: Option<PermitInput>,
}

#[derive(Debug, JsonSchema, Serialize, Deserialize)]
pub struct PermitInput {
    /// Unix timestamp after which the signature is invalid
    pub deadline: String,
    pub v: u8,
    /// 32-byte hex
    pub r: String,
    /// 32-byte hex
    pub s: String,
}

/// An unsigned transaction for an external signer.
#[derive(Debug, JsonSchema, Serialize)]
pub struct TransactionResponse {
    pub to: String,
    pub from: String,
    /// 0x-prefixed calldata
    pub data: String,
    /// Native currency to attach, in wei
    pub value: String,
}

impl From<UnsignedTransaction> for TransactionResponse {
    fn from(tx: UnsignedTransaction) -> Self {
        Self {
            to: tx.to.to_checksum(None),
            from: tx.from.to_checksum(None),
            data: tx.data.to_string(),
            value: tx.value.to_string(),
        }
    }
}

impl From<&RouteQuote> for RouteResponse {
    fn from(route: &RouteQuote) -> Self {
        let addresses = |list: &[Address]| -> Vec<String> {
            list.iter().map(|a| a.to_checksum(None)).collect()
        };

        Self {
            path: addresses(&route.path),
            adapters: addresses(&route.adapters),
            amounts: route.amounts.iter().map(U256::to_string).collect(),
            gas_estimate: route.gas_estimate.to_string(),
        }
    }
}

impl QuoteAmountOutResponse {
    pub fn new(amount_in: U256, quote: &AmountQuote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            decimals: quote.decimals,
            amount_in: amount_in.to_string(),
            unit_quote: quote.unit_quote.to_string(),
            formatted_unit_quote: format_units(quote.unit_quote, quote.decimals),
            amount_out: quote.amount_out.to_string(),
            formatted_amount_out: format_units(quote.amount_out, quote.decimals),
            route: RouteResponse::from(&quote.route),
        }
    }
}
