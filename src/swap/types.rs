use alloy::primitives::{Address, B256, Bytes, U256};

use crate::repository::RepositoryError;
use crate::repository::contract::ISwapRouter::FormattedOffer;

/// All-zero address standing in for the chain's native currency.
pub const NATIVE_SENTINEL: Address = Address::ZERO;

/// A token as supplied by the caller.
///
/// The native currency keeps [`NATIVE_SENTINEL`] as its address here; it is only swapped for
/// the wrapped-native contract at the point where a real ERC20 address is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub symbol: String,
    pub decimals: u8,
    pub address: Address,
}

impl Token {
    pub fn new(symbol: impl Into<String>, decimals: u8, address: Address) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            address,
        }
    }

    pub fn native(symbol: impl Into<String>, decimals: u8) -> Self {
        Self::new(symbol, decimals, NATIVE_SENTINEL)
    }

    pub fn is_native(&self) -> bool {
        self.address == NATIVE_SENTINEL
    }

    /// One whole token in its smallest unit (`10^decimals`), or `None` when that does not fit
    /// in 256 bits.
    pub fn unit(&self) -> Option<U256> {
        U256::from(10u64).checked_pow(U256::from(self.decimals))
    }
}

/// Best path reported by the router for a given input amount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQuote {
    pub amounts: Vec<U256>,
    pub adapters: Vec<Address>,
    pub path: Vec<Address>,
    pub gas_estimate: U256,
}

impl RouteQuote {
    /// A usable route has a non-empty path and amounts.
    pub fn has_route(&self) -> bool {
        !self.path.is_empty() && !self.amounts.is_empty()
    }

    /// Quoted output of the whole route.
    pub fn amount_out(&self) -> Option<U256> {
        self.amounts.last().copied()
    }

    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

impl From<FormattedOffer> for RouteQuote {
    fn from(offer: FormattedOffer) -> Self {
        Self {
            amounts: offer.amounts,
            adapters: offer.adapters,
            path: offer.path,
            gas_estimate: offer.gasEstimate,
        }
    }
}

/// Price of one whole `token_in` expressed in `token_out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPrice {
    pub symbol: String,
    pub decimals: u8,
    pub quote: U256,
}

/// Output for a specific input amount, alongside the unit price for reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountQuote {
    pub symbol: String,
    pub decimals: u8,
    pub unit_quote: U256,
    pub amount_out: U256,
    pub route: RouteQuote,
}

/// Result of a single preflight read. Each read keeps its own status.
pub type ReadResult<T> = Result<T, RepositoryError>;

/// Everything needed to decide whether a swap can go ahead, read in one round trip.
#[derive(Debug, Clone)]
pub struct PreflightSnapshot {
    pub quote: ReadResult<RouteQuote>,
    pub balance: ReadResult<U256>,
    /// Allowance granted to the router; `None` when the input is the native currency.
    pub allowance: Option<ReadResult<U256>>,
}

/// Router entry point used to execute a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapVariant {
    SwapNoSplit,
    SwapNoSplitFromNative,
    SwapNoSplitToNative,
}

impl SwapVariant {
    pub fn function_name(&self) -> &'static str {
        match self {
            SwapVariant::SwapNoSplit => "swapNoSplit",
            SwapVariant::SwapNoSplitFromNative => "swapNoSplitFromNative",
            SwapVariant::SwapNoSplitToNative => "swapNoSplitToNative",
        }
    }
}

impl std::fmt::Display for SwapVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.function_name())
    }
}

/// A fully formed call for an external signer. Nothing here is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub from: Address,
}

/// Signature fields of an EIP-2612 permit, produced off-chain by the token holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitSignature {
    pub deadline: U256,
    pub v: u8,
    pub r: B256,
    pub s: B256,
}
