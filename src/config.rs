use std::{fs, path::Path, str::FromStr, time::Duration};

use alloy::primitives::{Address, U256};
use anyhow::{Context, bail};
use dotenv::dotenv;
use envsubst::substitute;
use serde::Deserialize;

use crate::repository::alloy::MULTICALL3_ADDRESS;
use crate::swap::encoder::ROUTER_FEE;
use crate::swap::quoter::DEFAULT_MAX_HOPS;
use crate::swap::slippage::{BPS_DENOMINATOR, DEFAULT_SLIPPAGE_BPS};

/// Environment variable prefixes substituted into the YAML before parsing.
const ENV_PREFIXES: [&str; 3] = ["SERVER_", "RPC_", "ROUTER_"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub rpc: RpcConfig,
    pub router: RouterConfig,
}

impl Config {
    pub fn from_yaml(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        dotenv().ok();

        let path = path.as_ref();
        let file_content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file from path: {}", path.display()))?;

        let env_vars: std::collections::HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| ENV_PREFIXES.iter().any(|prefix| key.starts_with(prefix)))
            .collect();

        let interpolated = substitute(&file_content, &env_vars)
            .context("Failed to substitute environment variables in YAML")?;

        let config: Config =
            serde_yaml::from_str(&interpolated).context("Failed to parse YAML configuration")?;

        Ok(config)
    }

    pub fn server_uri(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    /// Upper bound for a single read or batch, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl RpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Router deployment and swap defaults as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    pub address: String,
    pub wrapped_native: String,
    #[serde(default = "default_multicall")]
    pub multicall: String,
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,
    #[serde(default = "default_fee")]
    pub fee: u64,
    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: u32,
}

impl RouterConfig {
    /// Parses addresses and checks ranges.
    pub fn settings(&self) -> anyhow::Result<RouterSettings> {
        if !(2..=5).contains(&self.max_hops) {
            bail!("router.max_hops must be between 2 and 5, got {}", self.max_hops);
        }
        if self.default_slippage_bps > BPS_DENOMINATOR {
            bail!(
                "router.default_slippage_bps must be at most {BPS_DENOMINATOR}, got {}",
                self.default_slippage_bps
            );
        }

        Ok(RouterSettings {
            router: parse_address("router.address", &self.address)?,
            wrapped_native: parse_address("router.wrapped_native", &self.wrapped_native)?,
            multicall: parse_address("router.multicall", &self.multicall)?,
            max_hops: self.max_hops,
            fee: U256::from(self.fee),
            default_slippage_bps: self.default_slippage_bps,
        })
    }
}

/// Validated router settings handed to the swap pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterSettings {
    pub router: Address,
    pub wrapped_native: Address,
    pub multicall: Address,
    pub max_hops: u32,
    pub fee: U256,
    pub default_slippage_bps: u32,
}

fn parse_address(field: &str, value: &str) -> anyhow::Result<Address> {
    Address::from_str(value.trim()).with_context(|| format!("Invalid {field}: {value}"))
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_multicall() -> String {
    MULTICALL3_ADDRESS.to_string()
}

fn default_max_hops() -> u32 {
    DEFAULT_MAX_HOPS
}

fn default_fee() -> u64 {
    ROUTER_FEE
}

fn default_slippage_bps() -> u32 {
    DEFAULT_SLIPPAGE_BPS
}
