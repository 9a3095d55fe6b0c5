use primitive_types::U256;

use crate::error::{require, MathError, Result};
use crate::math::fixedpoint::FixedPoint;

/// Weighted-pool trade quoting. Balances and amounts are fixed-point token
/// quantities; weights and the swap fee are fixed-point fractions of one.
///
/// Both quotes preserve the weighted product B_in^W_in * B_out^W_out: the
/// fee is charged on the way in, so the product the pool retains grows by
/// the fee share of every trade.
#[derive(Debug, Clone, Copy)]
pub struct WeightedSwap {
    math: FixedPoint,
    swap_fee: U256,
}

impl WeightedSwap {
    pub fn new(math: FixedPoint, swap_fee: U256) -> Result<WeightedSwap> {
        require!(swap_fee < math.rone(), MathError::Domain);
        Ok(WeightedSwap { math, swap_fee })
    }

    pub fn swap_fee(&self) -> U256 {
        self.swap_fee
    }

    fn after_fee(&self) -> U256 {
        // swap_fee < ONE by construction
        self.math.rone() - self.swap_fee
    }

    /// Out-amount received for `in_amount`:
    /// out = B_out * (1 - (B_in / (B_in + in*(1-fee)))^(W_in/W_out))
    pub fn calc_out_amount(
        &self,
        in_balance: U256,
        in_weight: U256,
        out_balance: U256,
        out_weight: U256,
        in_amount: U256,
    ) -> Result<U256> {
        require!(
            !in_balance.is_zero() && !out_balance.is_zero(),
            MathError::Domain
        );
        require!(
            !in_weight.is_zero() && !out_weight.is_zero(),
            MathError::Domain
        );

        let in_after_fee = self.math.rmul(in_amount, self.after_fee())?;
        let grown = in_balance
            .checked_add(in_after_fee)
            .ok_or(MathError::PrecisionOverflow)?;
        let ratio = self.math.rdiv(in_balance, grown)?;
        let weight_ratio = self.math.rdiv(in_weight, out_weight)?;
        let power = self.math.rpow(ratio, weight_ratio)?;
        self.math.rmul(out_balance, self.math.complement(power))
    }

    /// In-amount required to withdraw `out_amount`:
    /// in = B_in * ((B_out / (B_out - out))^(W_out/W_in) - 1) / (1 - fee)
    pub fn calc_in_amount(
        &self,
        in_balance: U256,
        in_weight: U256,
        out_balance: U256,
        out_weight: U256,
        out_amount: U256,
    ) -> Result<U256> {
        require!(
            !in_balance.is_zero() && !out_balance.is_zero(),
            MathError::Domain
        );
        require!(
            !in_weight.is_zero() && !out_weight.is_zero(),
            MathError::Domain
        );
        // the pool can never be drained to zero
        require!(out_amount < out_balance, MathError::Domain);

        let shrunk = out_balance - out_amount;
        let ratio = self.math.rdiv(out_balance, shrunk)?;
        let weight_ratio = self.math.rdiv(out_weight, in_weight)?;
        let power = self.math.rpow(ratio, weight_ratio)?;
        let growth = if power > self.math.rone() {
            power - self.math.rone()
        } else {
            U256::zero()
        };
        let raw = self.math.rmul(in_balance, growth)?;
        self.math.rdiv(raw, self.after_fee())
    }
}
