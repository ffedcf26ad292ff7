pub mod alloy;
pub mod contract;
pub mod error;

use ::alloy::primitives::{Address, Bytes, U256};
use ::alloy::sol_types::SolCall;
pub use alloy::AlloyChainTransport;
use async_trait::async_trait;
pub use error::RepositoryError;

pub(crate) type RepoResult<T> = std::result::Result<T, RepositoryError>;

/// A read-only contract call: target contract plus ABI-encoded calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadCall {
    pub target: Address,
    pub calldata: Bytes,
}

impl ReadCall {
    pub fn new<C: SolCall>(target: Address, call: &C) -> Self {
        Self {
            target,
            calldata: Bytes::from(call.abi_encode()),
        }
    }
}

/// Outcome of a single read, identical whether it travelled alone or inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Raw ABI-encoded return data.
    Success(Bytes),
    /// The call itself reverted or was rejected by the node.
    Failure(String),
}

impl ReadOutcome {
    /// Decodes the return data of a successful call as the return type of `C`.
    pub fn decode<C: SolCall>(&self) -> RepoResult<C::Return> {
        match self {
            ReadOutcome::Success(data) => C::abi_decode_returns(data).map_err(|e| {
                RepositoryError::ParseError(format!("Failed to decode {}: {e}", C::SIGNATURE))
            }),
            ReadOutcome::Failure(reason) => Err(RepositoryError::ContractError(format!(
                "{} failed: {reason}",
                C::SIGNATURE
            ))),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReadOutcome::Success(_))
    }
}

/// Read access to the chain used by the swap pipeline.
///
/// Implementations own RPC communication, batching and timeouts. A call that reverts is a
/// [`ReadOutcome::Failure`], not an `Err`: `Err` is reserved for the transport itself failing
/// (unreachable node, malformed response, timeout).
#[async_trait]
pub trait ChainTransport: Send + Sync {
    /// Executes a single `eth_call`.
    async fn read_one(&self, call: ReadCall) -> RepoResult<ReadOutcome>;

    /// Executes all `calls` in one round trip.
    ///
    /// Returns exactly one outcome per call, in order. Either every outcome is returned or the
    /// whole batch fails.
    async fn read_batch(&self, calls: Vec<ReadCall>) -> RepoResult<Vec<ReadOutcome>>;

    /// Retrieves the native currency balance of `owner` in its smallest unit.
    async fn native_balance(&self, owner: Address) -> RepoResult<U256>;
}
