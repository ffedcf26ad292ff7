use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256, hex};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::transports::RpcError;
use async_trait::async_trait;
use tracing::instrument;

use super::error::RepositoryError;
use crate::repository::contract::IMulticall3;
use crate::repository::{ChainTransport, ReadCall, ReadOutcome, RepoResult};

/// Canonical Multicall3 deployment address
pub const MULTICALL3_ADDRESS: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";

/// JSON-RPC error code nodes use for execution errors (reverts).
const EXECUTION_ERROR_CODE: i64 = 3;

/// Request limit exceeded.
const RATE_LIMITED_CODE: i64 = -32005;

pub struct AlloyChainTransport<P> {
    provider: Arc<P>,
    multicall: Address,
    timeout: Duration,
}

impl<P: Provider + Clone + 'static> AlloyChainTransport<P> {
    pub fn new(provider: Arc<P>, multicall: Address, timeout: Duration) -> Self {
        Self {
            provider,
            multicall,
            timeout,
        }
    }

    async fn with_timeout<T>(&self, fut: impl Future<Output = RepoResult<T>>) -> RepoResult<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| RepositoryError::Timeout(self.timeout.as_millis() as u64))?
    }
}

#[async_trait]
impl<P: Provider + Clone + Send + Sync + 'static> ChainTransport for AlloyChainTransport<P> {
    #[instrument(skip(self, call), fields(target = %call.target), err)]
    async fn read_one(&self, call: ReadCall) -> RepoResult<ReadOutcome> {
        let target = call.target;
        let request = TransactionRequest::default()
            .with_to(target)
            .with_input(call.calldata);

        self.with_timeout(async move {
            match self.provider.call(request).await {
                Ok(data) => Ok(ReadOutcome::Success(data)),
                Err(RpcError::ErrorResp(payload))
                    if is_revert(payload.code, &payload.message) =>
                {
                    tracing::debug!("eth_call reverted: {}", payload.message);
                    Ok(ReadOutcome::Failure(payload.message.to_string()))
                }
                // Rate limits, unknown methods, missing headers: the node failed, not the call
                Err(RpcError::ErrorResp(payload)) => {
                    if payload.code == RATE_LIMITED_CODE {
                        tracing::warn!("Rate limited while calling {}", target);
                    }
                    Err(RepositoryError::RpcError(format!(
                        "Node error {}: {}",
                        payload.code, payload.message
                    )))
                }
                Err(e) => {
                    if e.to_string().contains("429") {
                        tracing::warn!("Rate limited while calling {}", target);
                    }
                    Err(RepositoryError::RpcError(e.to_string()))
                }
            }
        })
        .await
    }

    #[instrument(skip(self, calls), fields(calls = calls.len()), err)]
    async fn read_batch(&self, calls: Vec<ReadCall>) -> RepoResult<Vec<ReadOutcome>> {
        let expected = calls.len();
        let multicall = IMulticall3::new(self.multicall, self.provider.clone());

        let calls = calls
            .into_iter()
            .map(|call| IMulticall3::Call3 {
                target: call.target,
                allowFailure: true,
                callData: call.calldata,
            })
            .collect::<Vec<_>>();

        let results = self
            .with_timeout(async move {
                multicall.aggregate3(calls).call().await.map_err(|e| {
                    tracing::error!("Multicall aggregate3 failed: {}", e);
                    RepositoryError::RpcError(format!("Batched read failed: {e}"))
                })
            })
            .await?;

        if results.len() != expected {
            return Err(RepositoryError::ParseError(format!(
                "Batched read returned {} results for {} calls",
                results.len(),
                expected
            )));
        }

        Ok(results
            .into_iter()
            .map(|result| {
                if result.success {
                    ReadOutcome::Success(result.returnData)
                } else {
                    ReadOutcome::Failure(format!(
                        "call reverted (0x{})",
                        hex_prefix(&result.returnData)
                    ))
                }
            })
            .collect())
    }

    #[instrument(skip(self), err)]
    async fn native_balance(&self, owner: Address) -> RepoResult<U256> {
        self.with_timeout(async move {
            self.provider.get_balance(owner).await.map_err(|e| {
                if e.to_string().contains("429") {
                    tracing::warn!("Rate limited while getting native balance for {}", owner);
                }
                RepositoryError::RpcError(e.to_string())
            })
        })
        .await
    }
}

/// Whether a JSON-RPC error reports the call reverting rather than the node failing.
///
/// Geth-style nodes use code 3 for reverts; others only say so in the message.
fn is_revert(code: i64, message: &str) -> bool {
    code == EXECUTION_ERROR_CODE || message.to_lowercase().contains("revert")
}

/// First bytes of revert data, enough to identify the error selector in logs.
fn hex_prefix(data: &[u8]) -> String {
    hex::encode(&data[..data.len().min(36)])
}
