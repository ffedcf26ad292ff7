use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;

use crate::config::RouterSettings;
use crate::repository::contract::{IERC20, ISwapRouter, ISwapRouter::FormattedOffer};
use crate::repository::{ChainTransport, ReadCall, ReadOutcome, RepoResult, RepositoryError};
use crate::swap::types::Token;

pub(crate) const ROUTER: &str = "0xD158Cb79C63F4852485E37F05D20da3093d143Ed";
pub(crate) const WMON: &str = "0x760AfE86e5de5fa0Ee542fc7B7B713e1c5425701";
pub(crate) const USDC: &str = "0xf817257fed379853cDe0fa4F97AB987181B1E5Ea";
pub(crate) const USER: &str = "0xcC84032Cb57340044Ce5e0F29019F75C32c632b9";

pub(crate) fn token_addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub(crate) fn router() -> Address {
    Address::from_str(ROUTER).expect("Invalid router address")
}

pub(crate) fn user() -> Address {
    Address::from_str(USER).expect("Invalid user address")
}

pub(crate) fn wmon() -> Token {
    Token::new(
        "WMON",
        18,
        Address::from_str(WMON).expect("Invalid WMON address"),
    )
}

pub(crate) fn usdc() -> Token {
    Token::new(
        "USDC",
        6,
        Address::from_str(USDC).expect("Invalid USDC address"),
    )
}

pub(crate) fn settings() -> RouterSettings {
    RouterSettings {
        router: router(),
        wrapped_native: wmon().address,
        multicall: token_addr(0xca),
        max_hops: 4,
        fee: U256::from(30u64),
        default_slippage_bps: 100,
    }
}

/// Router offer along `path`; one adapter per hop.
pub(crate) fn offer(amounts: &[u128], path: &[Address]) -> FormattedOffer {
    FormattedOffer {
        amounts: amounts.iter().map(|a| U256::from(*a)).collect(),
        adapters: (0..path.len().saturating_sub(1))
            .map(|i| token_addr(0xa0 + i as u8))
            .collect(),
        path: path.to_vec(),
        gasEstimate: U256::from(150_000u64),
    }
}

fn empty_offer() -> FormattedOffer {
    FormattedOffer {
        amounts: vec![],
        adapters: vec![],
        path: vec![],
        gasEstimate: U256::ZERO,
    }
}

/// In-memory chain answering router and ERC20 reads from scripted values.
#[derive(Default)]
pub(crate) struct MockTransport {
    default_quote: Option<FormattedOffer>,
    quotes_by_amount: Vec<(U256, FormattedOffer)>,
    token_balance: U256,
    allowance: U256,
    native_balance: U256,
    quote_reverts: bool,
    balance_reverts: bool,
    transport_down: bool,
    quote_read_fails: bool,
    native_balance_fails: bool,
    read_one_calls: AtomicUsize,
    read_batch_calls: AtomicUsize,
    native_balance_calls: AtomicUsize,
    path_queries: Mutex<Vec<(U256, Address, Address, u32)>>,
    erc20_targets: Mutex<Vec<Address>>,
}

impl MockTransport {
    pub(crate) fn with_default_quote(mut self, offer: FormattedOffer) -> Self {
        self.default_quote = Some(offer);
        self
    }

    pub(crate) fn with_quote_for(mut self, amount_in: U256, offer: FormattedOffer) -> Self {
        self.quotes_by_amount.push((amount_in, offer));
        self
    }

    pub(crate) fn with_token_balance(mut self, balance: U256) -> Self {
        self.token_balance = balance;
        self
    }

    pub(crate) fn with_allowance(mut self, allowance: U256) -> Self {
        self.allowance = allowance;
        self
    }

    pub(crate) fn with_native_balance(mut self, balance: U256) -> Self {
        self.native_balance = balance;
        self
    }

    /// `findBestPath` reverts inside otherwise healthy reads.
    pub(crate) fn reverting_quote(mut self) -> Self {
        self.quote_reverts = true;
        self
    }

    /// `balanceOf` reverts inside otherwise healthy reads.
    pub(crate) fn reverting_balance(mut self) -> Self {
        self.balance_reverts = true;
        self
    }

    /// Every read fails at the transport level.
    pub(crate) fn failing_transport(mut self) -> Self {
        self.transport_down = true;
        self
    }

    /// Single reads fail at the transport level; batches and balances still work.
    pub(crate) fn failing_quote_read(mut self) -> Self {
        self.quote_read_fails = true;
        self
    }

    pub(crate) fn failing_native_balance(mut self) -> Self {
        self.native_balance_fails = true;
        self
    }

    pub(crate) fn read_one_calls(&self) -> usize {
        self.read_one_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn read_batch_calls(&self) -> usize {
        self.read_batch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn native_balance_calls(&self) -> usize {
        self.native_balance_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.read_one_calls() + self.read_batch_calls() + self.native_balance_calls()
    }

    pub(crate) fn path_queries(&self) -> Vec<(U256, Address, Address, u32)> {
        self.path_queries.lock().expect("poisoned").clone()
    }

    pub(crate) fn erc20_targets(&self) -> Vec<Address> {
        self.erc20_targets.lock().expect("poisoned").clone()
    }

    fn unreachable() -> RepositoryError {
        RepositoryError::RpcError("error sending request: connection refused".to_string())
    }

    fn respond(&self, call: &ReadCall) -> ReadOutcome {
        let selector = call.calldata.get(..4).unwrap_or_default();

        if selector == &ISwapRouter::findBestPathCall::SELECTOR[..] {
            let decoded = ISwapRouter::findBestPathCall::abi_decode(&call.calldata)
                .expect("malformed findBestPath calldata");
            self.path_queries.lock().expect("poisoned").push((
                decoded._amountIn,
                decoded._tokenIn,
                decoded._tokenOut,
                decoded._maxSteps.to::<u32>(),
            ));

            if self.quote_reverts {
                return ReadOutcome::Failure("execution reverted".to_string());
            }

            let offer = self
                .quotes_by_amount
                .iter()
                .find(|(amount, _)| *amount == decoded._amountIn)
                .map(|(_, offer)| offer.clone())
                .or_else(|| self.default_quote.clone())
                .unwrap_or_else(empty_offer);
            return ReadOutcome::Success(Bytes::from(offer.abi_encode()));
        }

        if selector == &IERC20::balanceOfCall::SELECTOR[..] {
            self.erc20_targets.lock().expect("poisoned").push(call.target);
            if self.balance_reverts {
                return ReadOutcome::Failure("execution reverted".to_string());
            }
            return ReadOutcome::Success(Bytes::from(self.token_balance.abi_encode()));
        }

        if selector == &IERC20::allowanceCall::SELECTOR[..] {
            self.erc20_targets.lock().expect("poisoned").push(call.target);
            return ReadOutcome::Success(Bytes::from(self.allowance.abi_encode()));
        }

        ReadOutcome::Failure("unknown selector".to_string())
    }
}

#[async_trait]
impl ChainTransport for MockTransport {
    async fn read_one(&self, call: ReadCall) -> RepoResult<ReadOutcome> {
        self.read_one_calls.fetch_add(1, Ordering::SeqCst);
        if self.transport_down || self.quote_read_fails {
            return Err(Self::unreachable());
        }
        Ok(self.respond(&call))
    }

    async fn read_batch(&self, calls: Vec<ReadCall>) -> RepoResult<Vec<ReadOutcome>> {
        self.read_batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.transport_down {
            return Err(Self::unreachable());
        }
        Ok(calls.iter().map(|call| self.respond(call)).collect())
    }

    async fn native_balance(&self, _owner: Address) -> RepoResult<U256> {
        self.native_balance_calls.fetch_add(1, Ordering::SeqCst);
        if self.transport_down || self.native_balance_fails {
            return Err(Self::unreachable());
        }
        Ok(self.native_balance)
    }
}
