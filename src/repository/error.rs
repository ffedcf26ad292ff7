use thiserror::Error;

/// Failure of the chain access layer itself.
///
/// A call that reverts is not an error here; see [`super::ReadOutcome::Failure`]. The one
/// exception is [`RepositoryError::ContractError`], produced when a reverted outcome is decoded.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The node could not be reached or answered with a transport-level error.
    #[error("RPC error: {0}")]
    RpcError(String),

    /// A read reverted and its return value was requested.
    #[error("Contract call error: {0}")]
    ContractError(String),

    /// Return data did not match the expected ABI shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),
}
