pub mod app;
pub mod config;
pub mod middleware;
pub mod repository;
pub mod service;
pub mod swap;

pub use app::{build_app, build_orchestrator};

// Re-export commonly used types for tests
pub use service::{
    BuildApproveRequest, BuildSwapRequest, QuoteAmountOutRequest, QuoteUnitPriceRequest,
    RouterSwapService, TokenInput, TransactionResponse,
};
pub use swap::{SwapError, SwapErrorKind, SwapOrchestrator, Token, UnsignedTransaction};
