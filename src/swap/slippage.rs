//! Minimum-output guard derived from a quote and a tolerance in basis points.

use alloy::primitives::U256;

use super::error::SwapError;
use super::types::RouteQuote;

/// 100% in basis points.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Tolerance applied when the caller does not pass one (1%).
pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;

/// Rejects tolerances above 100%.
pub fn validate_slippage(tolerance_bps: u32) -> Result<u32, SwapError> {
    if tolerance_bps > BPS_DENOMINATOR {
        return Err(SwapError::InvalidSlippage(tolerance_bps));
    }
    Ok(tolerance_bps)
}

/// `floor(amountOut * (10000 - tolerance) / 10000)` of the quote's last amount.
///
/// Returns zero for a quote without amounts; such quotes are expected to have been rejected
/// already. The tolerance is not range-checked here, values above 10000 behave as 10000.
pub fn minimum_amount_out(quote: &RouteQuote, tolerance_bps: u32) -> U256 {
    let Some(amount_out) = quote.amount_out() else {
        return U256::ZERO;
    };
    apply_tolerance(amount_out, tolerance_bps)
}

/// Exact integer form of `amount * (10000 - bps) / 10000`.
///
/// Split as `q * keep + r * keep / 10000` with `amount = q * 10000 + r`, which never overflows
/// for any `U256` amount.
pub fn apply_tolerance(amount: U256, tolerance_bps: u32) -> U256 {
    let denominator = U256::from(BPS_DENOMINATOR);
    let keep = U256::from(BPS_DENOMINATOR.saturating_sub(tolerance_bps));

    let quotient = amount / denominator;
    let remainder = amount % denominator;

    quotient * keep + remainder * keep / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_with_output(amount_out: u64) -> RouteQuote {
        RouteQuote {
            amounts: vec![U256::from(1u64), U256::from(amount_out)],
            ..Default::default()
        }
    }

    #[test]
    fn test_one_percent_of_one_million() {
        let quote = quote_with_output(1_000_000);
        assert_eq!(minimum_amount_out(&quote, 100), U256::from(990_000u64));
    }

    #[test]
    fn test_near_total_tolerance_floors_to_zero() {
        let quote = quote_with_output(1);
        assert_eq!(minimum_amount_out(&quote, 9999), U256::ZERO);
    }

    #[test]
    fn test_empty_quote_yields_zero() {
        assert_eq!(minimum_amount_out(&RouteQuote::default(), 100), U256::ZERO);
    }

    #[test]
    fn test_zero_tolerance_keeps_full_amount() {
        let quote = quote_with_output(123_456_789);
        assert_eq!(minimum_amount_out(&quote, 0), U256::from(123_456_789u64));
        assert_eq!(minimum_amount_out(&quote, 10_000), U256::ZERO);
    }

    #[test]
    fn test_matches_naive_formula() {
        for amount in [0u64, 1, 7, 9_999, 10_000, 10_001, 2_000_000, 987_654_321] {
            for bps in [0u32, 1, 50, 100, 333, 5_000, 9_999, 10_000] {
                let expected = U256::from(amount) * U256::from(10_000 - bps) / U256::from(10_000);
                assert_eq!(apply_tolerance(U256::from(amount), bps), expected);
            }
        }
    }

    #[test]
    fn test_monotonic_and_bounded_in_tolerance() {
        let amounts = [
            U256::ZERO,
            U256::from(1u64),
            U256::from(999_999u64),
            U256::from(1_300_000_000_000_000_000u128),
            U256::MAX,
        ];

        for amount in amounts {
            let mut previous = apply_tolerance(amount, 0);
            assert_eq!(previous, amount);

            for bps in (0..=BPS_DENOMINATOR).step_by(37).chain([BPS_DENOMINATOR]) {
                let current = apply_tolerance(amount, bps);
                assert!(current <= amount, "result exceeds amount at {bps} bps");
                assert!(current <= previous, "not monotonic at {bps} bps");
                previous = current;
            }
        }
    }

    #[test]
    fn test_large_amounts_do_not_overflow() {
        let min_out = apply_tolerance(U256::MAX, 100);
        assert!(min_out < U256::MAX);
        assert!(min_out > U256::MAX / U256::from(2u64));
    }

    #[test]
    fn test_validate_slippage_bounds() {
        assert_eq!(validate_slippage(0).ok(), Some(0));
        assert_eq!(validate_slippage(10_000).ok(), Some(10_000));
        match validate_slippage(10_001) {
            Err(SwapError::InvalidSlippage(bps)) => assert_eq!(bps, 10_001),
            other => panic!("Expected InvalidSlippage, got: {:?}", other),
        }
    }
}
