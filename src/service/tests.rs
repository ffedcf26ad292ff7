use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::{Address, U256, hex};
use alloy::sol_types::SolCall;
use rmcp::handler::server::wrapper::Parameters;
use tokio::time::{Duration, sleep};

use crate::app::build_orchestrator;
use crate::config::Config;
use crate::repository::contract::{IERC20, ISwapRouter};
use crate::service::error::ServiceError;
use crate::service::token_registry::TokenRegistry;
use crate::service::trading::RouterSwapService;
use crate::service::types::{
    BuildApproveRequest, BuildApproveResult, BuildSwapRequest, BuildSwapResult, PermitInput,
    QuoteAmountOutRequest, QuoteAmountOutResult, QuoteUnitPriceRequest, QuoteUnitPriceResult,
    TokenInput,
};
use crate::swap::SwapOrchestrator;
use crate::swap::test_support::{MockTransport, USER, offer, router, settings, usdc, user, wmon};

fn service(transport: MockTransport) -> RouterSwapService {
    let settings = settings();
    RouterSwapService::new(
        SwapOrchestrator::new(Arc::new(transport), &settings),
        TokenRegistry::new(settings.wrapped_native),
    )
}

fn mon_to_usdc_quote() -> MockTransport {
    MockTransport::default().with_default_quote(offer(
        &[1_300_000_000_000_000_000, 2_000_000],
        &[wmon().address, usdc().address],
    ))
}

#[tokio::test]
async fn test_build_swap_from_native_should_work() {
    let service = service(
        mon_to_usdc_quote().with_native_balance(U256::from(2_000_000_000_000_000_000u128)),
    );
    let params = Parameters(BuildSwapRequest {
        token_in: TokenInput::symbol("MON"),
        token_out: TokenInput::symbol("usdc"),
        amount: "1.3".to_string(),
        user_address: USER.to_string(),
        slippage_bps: Some(100),
    });

    match service.build_swap(params).await.0 {
        BuildSwapResult::Success(tx) => {
            assert_eq!(Address::from_str(&tx.to).unwrap(), router());
            assert_eq!(Address::from_str(&tx.from).unwrap(), user());
            assert_eq!(tx.value, "1300000000000000000");

            let data = hex::decode(&tx.data).expect("calldata is not hex");
            let decoded = ISwapRouter::swapNoSplitFromNativeCall::abi_decode(&data)
                .expect("decode failed");
            assert_eq!(decoded._trade.amountOut, U256::from(1_980_000u64));
        }
        BuildSwapResult::Error { error } => {
            panic!("Expected success but got error: {}", error);
        }
    }
}

#[tokio::test]
async fn test_build_swap_without_allowance_returns_typed_error() {
    let service = service(
        MockTransport::default()
            .with_default_quote(offer(&[1_000_000, 570_000_000_000_000_000], &[
                usdc().address,
                wmon().address,
            ]))
            .with_token_balance(U256::from(1_000_000u64)),
    );
    let params = Parameters(BuildSwapRequest {
        token_in: TokenInput::symbol("USDC"),
        token_out: TokenInput::symbol("WMON"),
        amount: "1".to_string(),
        user_address: USER.to_string(),
        slippage_bps: None,
    });

    match service.build_swap(params).await.0 {
        BuildSwapResult::Success(_) => panic!("Expected error but got success"),
        BuildSwapResult::Error { error } => match error {
            ServiceError::InsufficientAllowance {
                required,
                available,
            } => {
                assert_eq!(required, "1000000");
                assert_eq!(available, "0");
            }
            other => panic!("Expected InsufficientAllowance error, got: {:?}", other),
        },
    }
}

#[tokio::test]
async fn test_build_swap_rejects_bad_input_before_reading() {
    for (token_out, amount, user, expected) in [
        ("DOGE", "1", USER, "TokenNotFound"),
        ("USDC", "0", USER, "InvalidAmount"),
        ("USDC", "-1", USER, "InvalidAmount"),
        ("USDC", "1", "invalid_address", "InvalidAddress"),
        ("MON", "1", USER, "SameToken"),
    ] {
        let params = Parameters(BuildSwapRequest {
            token_in: TokenInput::symbol("MON"),
            token_out: TokenInput::symbol(token_out),
            amount: amount.to_string(),
            user_address: user.to_string(),
            slippage_bps: None,
        });

        match service(MockTransport::default().failing_transport())
            .build_swap(params)
            .await
            .0
        {
            BuildSwapResult::Success(_) => panic!("Expected error but got success"),
            BuildSwapResult::Error { error } => {
                let json = serde_json::to_value(&error).expect("serialization failed");
                assert_eq!(json["type"], expected, "unexpected error: {error}");
            }
        }
    }
}

#[tokio::test]
async fn test_quote_unit_price_formats_in_output_decimals() {
    let service = service(MockTransport::default().with_default_quote(offer(
        &[1_000_000_000_000_000_000, 3_512_345],
        &[wmon().address, usdc().address],
    )));
    let params = Parameters(QuoteUnitPriceRequest {
        token_in: TokenInput::symbol("MON"),
        token_out: TokenInput::symbol("USDC"),
    });

    match service.quote_unit_price(params).await.0 {
        QuoteUnitPriceResult::Success(resp) => {
            assert_eq!(resp.symbol, "USDC");
            assert_eq!(resp.decimals, 6);
            assert_eq!(resp.quote, "3512345");
            assert_eq!(resp.formatted_quote, "3.512345");
        }
        QuoteUnitPriceResult::Error { error } => {
            panic!("Expected success but got error: {}", error);
        }
    }
}

#[tokio::test]
async fn test_quote_amount_out_with_custom_token_should_work() {
    let service = service(mon_to_usdc_quote());
    let params = Parameters(QuoteAmountOutRequest {
        token_in: TokenInput::Custom {
            symbol: "MON".to_string(),
            decimals: 18,
            address: "0x0000000000000000000000000000000000000000".to_string(),
        },
        token_out: TokenInput::symbol("USDC"),
        amount: "1.3".to_string(),
    });

    match service.quote_amount_out(params).await.0 {
        QuoteAmountOutResult::Success(resp) => {
            assert_eq!(resp.amount_in, "1300000000000000000");
            assert_eq!(resp.amount_out, "2000000");
            assert_eq!(resp.formatted_amount_out, "2");
            assert_eq!(resp.route.path.len(), 2);
            assert_eq!(resp.route.adapters.len(), 1);
        }
        QuoteAmountOutResult::Error { error } => {
            panic!("Expected success but got error: {}", error);
        }
    }
}

#[tokio::test]
async fn test_quote_without_route_is_distinguishable_from_transport_failure() {
    let params = || {
        Parameters(QuoteUnitPriceRequest {
            token_in: TokenInput::symbol("WMON"),
            token_out: TokenInput::symbol("USDC"),
        })
    };

    match service(MockTransport::default()).quote_unit_price(params()).await.0 {
        QuoteUnitPriceResult::Error {
            error: ServiceError::NoRouteFound { .. },
        } => {}
        other => panic!("Expected NoRouteFound, got: {:?}", other),
    }

    match service(MockTransport::default().failing_transport())
        .quote_unit_price(params())
        .await
        .0
    {
        QuoteUnitPriceResult::Error {
            error: ServiceError::BlockchainError(_),
        } => {}
        other => panic!("Expected BlockchainError, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_build_approve_and_permit_should_work() {
    let service = service(MockTransport::default());

    let approve = Parameters(BuildApproveRequest {
        token: TokenInput::symbol("USDC"),
        amount: "25".to_string(),
        user_address: USER.to_string(),
        permit: None,
    });
    match service.build_approve(approve).await.0 {
        BuildApproveResult::Success(tx) => {
            let data = hex::decode(&tx.data).expect("calldata is not hex");
            let decoded = IERC20::approveCall::abi_decode(&data).expect("decode failed");
            assert_eq!(decoded.amount, U256::from(25_000_000u64));
            assert_eq!(tx.value, "0");
        }
        BuildApproveResult::Error { error } => {
            panic!("Expected success but got error: {}", error);
        }
    }

    let permit = Parameters(BuildApproveRequest {
        token: TokenInput::symbol("USDC"),
        amount: "25".to_string(),
        user_address: USER.to_string(),
        permit: Some(PermitInput {
            deadline: "4102444800".to_string(),
            v: 27,
            r: format!("0x{}", "11".repeat(32)),
            s: format!("0x{}", "22".repeat(32)),
        }),
    });
    match service.build_approve(permit).await.0 {
        BuildApproveResult::Success(tx) => {
            let data = hex::decode(&tx.data).expect("calldata is not hex");
            let decoded = IERC20::permitCall::abi_decode(&data).expect("decode failed");
            assert_eq!(decoded.deadline, U256::from(4_102_444_800u64));
            assert_eq!(decoded.v, 27);
        }
        BuildApproveResult::Error { error } => {
            panic!("Expected success but got error: {}", error);
        }
    }

    let expired = Parameters(BuildApproveRequest {
        token: TokenInput::symbol("USDC"),
        amount: "25".to_string(),
        user_address: USER.to_string(),
        permit: Some(PermitInput {
            deadline: "1".to_string(),
            v: 27,
            r: format!("0x{}", "11".repeat(32)),
            s: format!("0x{}", "22".repeat(32)),
        }),
    });
    match service.build_approve(expired).await.0 {
        BuildApproveResult::Error {
            error: ServiceError::InvalidPermit(_),
        } => {}
        other => panic!("Expected InvalidPermit, got: {:?}", other),
    }

    let native = Parameters(BuildApproveRequest {
        token: TokenInput::symbol("MON"),
        amount: "1".to_string(),
        user_address: USER.to_string(),
        permit: None,
    });
    match service.build_approve(native).await.0 {
        BuildApproveResult::Error {
            error: ServiceError::NativeApproval,
        } => {}
        other => panic!("Expected NativeApproval, got: {:?}", other),
    }
}

/// Add delay between tests to avoid rate limiting
async fn avoid_rate_limit() {
    sleep(Duration::from_millis(500)).await;
}

fn live_service() -> RouterSwapService {
    let config = Config::from_yaml("config/test.yaml").expect("failed to load test config");
    let (orchestrator, registry) = build_orchestrator(&config).expect("failed to build pipeline");
    RouterSwapService::new(orchestrator, registry)
}

#[tokio::test]
#[serial_test::serial]
#[ignore]
async fn test_quote_unit_price_against_testnet_should_work() {
    avoid_rate_limit().await;
    let params = Parameters(QuoteUnitPriceRequest {
        token_in: TokenInput::symbol("MON"),
        token_out: TokenInput::symbol("USDC"),
    });

    match live_service().quote_unit_price(params).await.0 {
        QuoteUnitPriceResult::Success(resp) => {
            println!("✅ 1 MON = {} USDC", resp.formatted_quote);
            assert_eq!(resp.decimals, 6);
        }
        QuoteUnitPriceResult::Error { error } => {
            panic!("Expected success but got error: {}", error);
        }
    }
}

#[tokio::test]
#[serial_test::serial]
#[ignore]
async fn test_build_swap_against_testnet_reports_a_typed_outcome() {
    avoid_rate_limit().await;
    let params = Parameters(BuildSwapRequest {
        token_in: TokenInput::symbol("USDC"),
        token_out: TokenInput::symbol("MON"),
        amount: "1".to_string(),
        user_address: USER.to_string(),
        slippage_bps: None,
    });

    match live_service().build_swap(params).await.0 {
        BuildSwapResult::Success(tx) => {
            println!("✅ Unsigned swap to {} with {} bytes of calldata", tx.to, tx.data.len());
        }
        BuildSwapResult::Error { error } => {
            println!("✅ Swap not possible right now: {}", error);
            assert!(!matches!(error, ServiceError::BlockchainError(_)));
        }
    }
}
