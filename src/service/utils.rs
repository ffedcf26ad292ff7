//! Conversion between human-readable amounts and token base units
//!
//! Parsing goes through `Decimal` so inputs like "1.3" or "100.5" are read exactly; the scaling
//! itself is done on `U256` so large amounts never overflow the decimal type.

use alloy::primitives::U256;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::ServiceResult;
use super::error::ServiceError;

/// Largest power of ten that fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

fn pow10(exponent: u32) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(exponent))
}

/// Parse human-readable amount (e.g., "1.5") to smallest unit based on decimals
///
/// Digits beyond `decimals` are truncated.
///
/// # Examples
/// - "1.3" with 18 decimals -> 1300000000000000000
/// - "100" with 6 decimals -> 100000000
pub fn parse_amount(amount: &str, decimals: u8) -> ServiceResult<U256> {
    let value = Decimal::from_str(amount.trim())
        .map_err(|e| ServiceError::InvalidAmount(format!("{amount}: {e}")))?;

    if value.is_sign_negative() {
        return Err(ServiceError::InvalidAmount(format!(
            "{amount}: must not be negative"
        )));
    }

    let mantissa = U256::from(value.mantissa().unsigned_abs());
    let scale = value.scale();
    let decimals = u32::from(decimals);

    let raw = if scale <= decimals {
        pow10(decimals - scale).and_then(|factor| mantissa.checked_mul(factor))
    } else {
        pow10(scale - decimals).map(|divisor| mantissa / divisor)
    };

    raw.ok_or_else(|| ServiceError::InvalidAmount(format!("{amount}: too large")))
}

/// Format a value from smallest unit to human-readable format
///
/// Trailing zeros are removed; whole amounts have no decimal point.
pub fn format_units(value: U256, decimals: u8) -> String {
    let Some(divisor) = pow10(u32::from(decimals)) else {
        return value.to_string();
    };
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_part = remainder.to_string();
        let padded = format!("{:0>width$}", decimal_part, width = decimals as usize);
        let trimmed = padded.trim_end_matches('0');
        format!("{whole}.{trimmed}")
    }
}
