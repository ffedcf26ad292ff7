use std::collections::HashMap;

use alloy::primitives::{Address, address};

use crate::swap::Token;

/// USDC on Monad testnet
const USDC_ADDRESS: Address = address!("0xf817257fed379853cDe0fa4F97AB987181B1E5Ea");
const USDC_DECIMALS: u8 = 6;

const NATIVE_SYMBOL: &str = "MON";
const NATIVE_DECIMALS: u8 = 18;

/// Token registry for mapping symbols to tokens the router can trade
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    registry: HashMap<String, Token>,
}

impl TokenRegistry {
    /// Registry with the native currency, its wrapped form and USDC.
    pub fn new(wrapped_native: Address) -> Self {
        let mut registry = HashMap::new();

        registry.insert(
            NATIVE_SYMBOL.to_string(),
            Token::native(NATIVE_SYMBOL, NATIVE_DECIMALS),
        );
        registry.insert(
            "WMON".to_string(),
            Token::new("WMON", NATIVE_DECIMALS, wrapped_native),
        );
        registry.insert(
            "USDC".to_string(),
            Token::new("USDC", USDC_DECIMALS, USDC_ADDRESS),
        );

        Self { registry }
    }

    /// Lookup token by symbol (case-insensitive)
    pub fn lookup(&self, symbol: &str) -> Option<&Token> {
        self.registry.get(&symbol.trim().to_uppercase())
    }

    /// Get list of all supported token symbols (sorted alphabetically)
    pub fn supported_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.registry.keys().cloned().collect();
        tokens.sort();
        tokens
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.lookup(symbol).is_some()
    }
}
