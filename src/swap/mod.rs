pub mod address;
pub mod approve;
pub mod encoder;
pub mod error;
pub mod orchestrator;
pub mod preflight;
pub mod quoter;
pub mod slippage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use address::AddressNormalizer;
pub use encoder::TransactionEncoder;
pub use error::{SwapError, SwapErrorKind};
pub use orchestrator::{SwapBranch, SwapOrchestrator};
pub use preflight::PreflightChecker;
pub use quoter::RouteQuoter;
pub use types::{
    AmountQuote, NATIVE_SENTINEL, PermitSignature, PreflightSnapshot, RouteQuote, SwapVariant,
    Token, UnitPrice, UnsignedTransaction,
};
