//! Fee and payout arithmetic
//!
//! All products are formed in `u128` and truncated toward zero before being
//! narrowed back to [`Amount`], so no intermediate step can overflow or round
//! in the player's favour.

use crate::common::types::{Amount, BPS_DENOMINATOR};
use crate::errors::{WagerError, WagerResult};

/// Exact rational multiplier `numerator / denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    numerator: u64,
    denominator: u64,
}

impl Ratio {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// `(10000 + bps) / 10000`: principal plus fee
    pub const fn with_fee_bps(bps: u64) -> Self {
        Self::new(BPS_DENOMINATOR + bps, BPS_DENOMINATOR)
    }

    /// `bps / 10000`: the fee alone
    pub const fn bps(bps: u64) -> Self {
        Self::new(bps, BPS_DENOMINATOR)
    }

    /// `floor(amount * numerator / denominator)`
    pub fn mul_floor(&self, amount: Amount, what: &'static str) -> WagerResult<Amount> {
        if self.denominator == 0 {
            return Err(WagerError::AmountOverflow(what));
        }
        let scaled = amount as u128 * self.numerator as u128 / self.denominator as u128;
        Amount::try_from(scaled).map_err(|_| WagerError::AmountOverflow(what))
    }
}

/// Stake plus fee debited from the player on a coin flip
pub fn amount_with_fee(amount: Amount, fee_bps: u64) -> WagerResult<Amount> {
    Ratio::with_fee_bps(fee_bps).mul_floor(amount, "amount with fee")
}

/// Fee routed to the external receiver on a delegate flip
pub fn fee_portion(amount: Amount, fee_bps: u64) -> WagerResult<Amount> {
    Ratio::bps(fee_bps).mul_floor(amount, "fee portion")
}

/// Coin-flip win payout, on the pre-fee stake
pub fn flip_payout(amount: Amount, multiplier: u64) -> WagerResult<Amount> {
    amount
        .checked_mul(multiplier)
        .ok_or(WagerError::AmountOverflow("flip payout"))
}

/// Roulette win payout `floor(amount * 36 / chosen)`. `chosen` must be > 0.
pub fn roulette_payout(amount: Amount, payout_numerator: u64, chosen: usize) -> WagerResult<Amount> {
    if chosen == 0 {
        return Err(WagerError::ZeroChoices);
    }
    Ratio::new(payout_numerator, chosen as u64).mul_floor(amount, "roulette payout")
}
