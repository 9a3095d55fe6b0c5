use primitive_types::U256;

use super::swap::WeightedSwap;
use crate::error::{require, MathError, Result};
use crate::math::fixedpoint::FixedPoint;

/// Two-token weighted pool with time-decaying weights and protocol-fee
/// accrual.
///
/// Balances and the LP supply are fixed-point quantities. The pool tracks
/// the last settled invariant `k = B_a^W_a * B_b^W_b` (fractional weights);
/// swap fees stay in the pool and grow k, and on every settlement the
/// treasury is minted the LP amount that captures its share of that growth:
///
///   minted = supply * (k_now - k_last) / (((1 - phi)/phi) * k_now + k_last)
///
/// where `phi` is the protocol's share of the swap fee.
#[derive(Debug, Clone)]
pub struct Pool {
    math: FixedPoint,
    swap: WeightedSwap,
    balance_a: U256,
    balance_b: U256,
    total_supply: U256,
    treasury: U256,
    protocol_fee: U256,
    k_last: U256,
}

impl Pool {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        math: FixedPoint,
        swap_fee: U256,
        protocol_fee: U256,
        balance_a: U256,
        balance_b: U256,
        initial_supply: U256,
        weights: (U256, U256),
    ) -> Result<Pool> {
        require!(!balance_a.is_zero() && !balance_b.is_zero(), MathError::Domain);
        require!(!initial_supply.is_zero(), MathError::Domain);
        // the settlement denominator divides by phi and scales by 1 - phi
        require!(
            !protocol_fee.is_zero() && protocol_fee < math.rone(),
            MathError::Domain
        );

        let swap = WeightedSwap::new(math, swap_fee)?;
        let mut pool = Pool {
            math,
            swap,
            balance_a,
            balance_b,
            total_supply: initial_supply,
            treasury: U256::zero(),
            protocol_fee,
            k_last: U256::zero(),
        };
        pool.k_last = pool.invariant(weights)?;
        Ok(pool)
    }

    pub fn balances(&self) -> (U256, U256) {
        (self.balance_a, self.balance_b)
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn treasury(&self) -> U256 {
        self.treasury
    }

    pub fn k_last(&self) -> U256 {
        self.k_last
    }

    /// k = B_a^W_a * B_b^W_b at the given weights.
    pub fn invariant(&self, weights: (U256, U256)) -> Result<U256> {
        let pow_a = self.math.rpow(self.balance_a, weights.0)?;
        let pow_b = self.math.rpow(self.balance_b, weights.1)?;
        self.math.rmul(pow_a, pow_b)
    }

    /// Mints the treasury's LP share for invariant growth since the last
    /// settlement and re-bases `k_last`. Returns the minted amount, zero
    /// when k did not grow.
    pub fn settle_treasury(&mut self, weights: (U256, U256)) -> Result<U256> {
        let k_now = self.invariant(weights)?;
        let minted = if k_now > self.k_last {
            let numer = self.math.rmul(self.total_supply, k_now - self.k_last)?;
            let scale = self
                .math
                .rdiv(self.math.rone() - self.protocol_fee, self.protocol_fee)?;
            let denom = self
                .math
                .rmul(scale, k_now)?
                .checked_add(self.k_last)
                .ok_or(MathError::PrecisionOverflow)?;
            let gained = self.math.rdiv(numer, denom)?;
            self.treasury = self
                .treasury
                .checked_add(gained)
                .ok_or(MathError::PrecisionOverflow)?;
            self.total_supply = self
                .total_supply
                .checked_add(gained)
                .ok_or(MathError::PrecisionOverflow)?;
            gained
        } else {
            U256::zero()
        };
        self.k_last = k_now;
        Ok(minted)
    }

    /// Swaps `in_amount` of token A for token B at the given weights.
    /// Returns (out_amount, treasury LP minted by the settlement).
    pub fn swap_a_for_b(
        &mut self,
        weights: (U256, U256),
        in_amount: U256,
    ) -> Result<(U256, U256)> {
        // re-base k at the current weights before the trade, so the
        // settlement only sees growth caused by the trade's fee
        self.k_last = self.invariant(weights)?;

        let out = self.swap.calc_out_amount(
            self.balance_a,
            weights.0,
            self.balance_b,
            weights.1,
            in_amount,
        )?;
        require!(out < self.balance_b, MathError::Domain);

        self.balance_a = self
            .balance_a
            .checked_add(in_amount)
            .ok_or(MathError::PrecisionOverflow)?;
        self.balance_b = self.balance_b - out;

        let minted = self.settle_treasury(weights)?;
        Ok((out, minted))
    }

    /// Swaps `in_amount` of token B for token A at the given weights.
    pub fn swap_b_for_a(
        &mut self,
        weights: (U256, U256),
        in_amount: U256,
    ) -> Result<(U256, U256)> {
        self.k_last = self.invariant(weights)?;

        let out = self.swap.calc_out_amount(
            self.balance_b,
            weights.1,
            self.balance_a,
            weights.0,
            in_amount,
        )?;
        require!(out < self.balance_a, MathError::Domain);

        self.balance_b = self
            .balance_b
            .checked_add(in_amount)
            .ok_or(MathError::PrecisionOverflow)?;
        self.balance_a = self.balance_a - out;

        let minted = self.settle_treasury(weights)?;
        Ok((out, minted))
    }

    /// Adds liquidity on both sides. The deposit is scaled down on the
    /// richer side so it matches the pool ratio; LP units are minted pro
    /// rata. Returns the minted LP amount.
    pub fn add_liquidity_dual(
        &mut self,
        weights: (U256, U256),
        amount: U256,
    ) -> Result<U256> {
        require!(!amount.is_zero(), MathError::Domain);

        let mut add_a = amount;
        let mut add_b = amount;
        if self.balance_a < self.balance_b {
            add_a = self
                .math
                .rmul(amount, self.math.rdiv(self.balance_a, self.balance_b)?)?;
        } else {
            add_b = self
                .math
                .rmul(amount, self.math.rdiv(self.balance_b, self.balance_a)?)?;
        }

        self.balance_a = self
            .balance_a
            .checked_add(add_a)
            .ok_or(MathError::PrecisionOverflow)?;
        self.balance_b = self
            .balance_b
            .checked_add(add_b)
            .ok_or(MathError::PrecisionOverflow)?;

        let minted = self
            .math
            .rmul(self.total_supply, self.math.rdiv(add_a, self.balance_a)?)?;
        self.total_supply = self
            .total_supply
            .checked_add(minted)
            .ok_or(MathError::PrecisionOverflow)?;

        self.k_last = self.invariant(weights)?;
        Ok(minted)
    }
}
