// SPDX-License-Identifier: MIT
// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the
// Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE
// WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR
// OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use primitive_types::{U256, U512};

use super::fixedpoint::{narrow, FixedPoint, OVERFLOW_GUARD};
use crate::error::{require, MathError, Result};

/**
 * @dev Exponentiation and logarithm over non-negative fixed-point values,
 * built from the rounded primitives: square-and-multiply for integer
 * exponents, repeated-squaring bit extraction for base-2 logarithms, a
 * fixed rational ln 2 for the natural-log conversion, and a capped
 * Maclaurin series for the exponential.
 *
 * Arbitrary fractional powers (x^y) are composed from these via
 * x^y = x^whole(y) * e^(frac(y) * ln(x)).
 */

// ln(2) as the fixed rational LN2_NUMERATOR / LN2_DENOMINATOR.
// LN2_NUMERATOR = 6_931_471_805_599_453_094_172
const LN2_NUMERATOR: U256 = U256([13942777958371238172, 375, 0, 0]);
// LN2_DENOMINATOR = 10^22
const LN2_DENOMINATOR: U256 = U256([1864712049423024128, 542, 0, 0]);

// Hard ceiling on exponential-series iterations. Every input inside the
// overflow guard collapses to a zero term long before this; hitting the
// ceiling means the domain contract was violated upstream.
const RPOWE_ITERATION_CEILING: u32 = 500;

impl FixedPoint {
    /**
     * @dev base^exp for a non-negative integer exponent, by LSB-first
     * square-and-multiply: O(log exp) rounded multiplications.
     *
     * rpowi(base, 0) == ONE for every base, zero included.
     */
    pub fn rpowi(&self, base: U256, exp: U256) -> Result<U256> {
        require!(base <= OVERFLOW_GUARD, MathError::PrecisionOverflow);

        let mut base = base;
        let mut exp = exp;
        let mut res = if is_odd(exp) { base } else { self.rone() };

        exp = exp >> 1u32;
        while !exp.is_zero() {
            base = self.rmul(base, base)?;
            if is_odd(exp) {
                res = self.rmul(res, base)?;
            }
            exp = exp >> 1u32;
        }

        require!(res <= OVERFLOW_GUARD, MathError::PrecisionOverflow);
        Ok(res)
    }

    /**
     * @dev log2(p/q) scaled by ONE, for integers p >= q >= 1 (the ratio
     * must be at least one; smaller ratios would need a sign). The integer
     * part comes from repeatedly halving floor(p/q); the remaining ratio is
     * normalized into [1, 2) and its fractional bits extracted.
     */
    pub fn log2(&self, p: U256, q: U256) -> Result<U256> {
        require!(!p.is_zero() && !q.is_zero(), MathError::Domain);
        require!(
            p <= OVERFLOW_GUARD && q <= OVERFLOW_GUARD,
            MathError::PrecisionOverflow
        );

        let mut n: u32 = 0;
        if p > q {
            n = Self::log2_int(p, q);
        }

        // y = p*ONE / (q * 2^n) lies in [ONE, 2*ONE)
        let scaled_q = q
            .checked_mul(U256::one() << n)
            .ok_or(MathError::PrecisionOverflow)?;
        let y = narrow(p.full_mul(self.rone()) / U512::from(scaled_q))?;
        let frac = self.log2_small(y)?;

        let int_part = U256::from(n)
            .checked_mul(self.rone())
            .ok_or(MathError::PrecisionOverflow)?;
        require!(int_part <= OVERFLOW_GUARD, MathError::PrecisionOverflow);
        require!(frac <= OVERFLOW_GUARD, MathError::PrecisionOverflow);

        int_part
            .checked_add(frac)
            .ok_or(MathError::PrecisionOverflow)
    }

    /// Floor of log2(p/q) for p > q >= 1, by repeated halving of the
    /// integer quotient.
    fn log2_int(p: U256, q: U256) -> u32 {
        let mut remain = p / q;
        let mut res: u32 = 0;
        while !remain.is_zero() {
            res += 1;
            remain = remain >> 1u32;
        }
        res - 1
    }

    /**
     * @dev Fractional bits of log2(x) for x in [ONE, 2*ONE), recovered by
     * exactly `precision_bits` rounds of squaring: each squaring doubles
     * the exponent, and crossing 2 exposes the next bit of the binary
     * expansion.
     */
    fn log2_small(&self, x: U256) -> Result<U256> {
        let one = self.rone();
        let two = one << 1u32;
        require!(x >= one && x < two, MathError::Domain);

        let mut x = x;
        let mut res = U256::zero();
        let mut addition = one;
        for _ in 0..self.precision_bits() {
            // x stays below 2*ONE, so the square sits far inside 512 bits
            x = narrow(x.full_mul(x) / U512::from(one))?;
            addition = addition >> 1u32;
            if x >= two {
                x = x >> 1u32;
                res = res
                    .checked_add(addition)
                    .ok_or(MathError::PrecisionOverflow)?;
            }
        }
        Ok(res)
    }

    /**
     * @dev Natural logarithm of p/q scaled by ONE, via the base change
     * ln(x) = log2(x) * ln(2). The multiplication by the rational ln 2
     * truncates: the result carries a downward bias of at most one unit.
     */
    pub fn ln(&self, p: U256, q: U256) -> Result<U256> {
        let log2x = self.log2(p, q)?;
        narrow(log2x.full_mul(LN2_NUMERATOR) / U512::from(LN2_DENOMINATOR))
    }

    /**
     * @dev e^x for a non-negative fixed-point x, by the Maclaurin series
     * 1 + x + x^2/2! + x^3/3! + ..., each term derived from the previous
     * one, accumulated until a term rounds to exactly zero.
     *
     * The iteration ceiling is a termination guard, not a tuning knob:
     * convergence is an assumption about the input domain, and the ceiling
     * turns a violated assumption into a typed error instead of a spin.
     */
    pub fn rpowe(&self, exp: U256) -> Result<U256> {
        require!(exp <= OVERFLOW_GUARD, MathError::PrecisionOverflow);

        let mut res = U256::zero();
        let mut term = self.rone();
        let mut n: u32 = 0;
        loop {
            res = res.checked_add(term).ok_or(MathError::PrecisionOverflow)?;
            term = self.rmul(term, self.rdiv(exp, self.to_fp(U256::from(n + 1))?)?)?;
            if term.is_zero() {
                break;
            }
            n += 1;
            require!(n <= RPOWE_ITERATION_CEILING, MathError::NonConvergence);
        }

        require!(res <= OVERFLOW_GUARD, MathError::PrecisionOverflow);
        Ok(res)
    }

    /**
     * @dev base^exp over non-negative fixed-point values. The exponent is
     * split into its whole and fractional parts: the whole part goes
     * through rpowi, the fractional part through e^(frac * ln(base)).
     *
     * Bases below one use the reciprocal identity
     * base^frac = 1 / (ONE/base)^frac, keeping every logarithm argument at
     * or above one.
     */
    pub fn rpow(&self, base: U256, exp: U256) -> Result<U256> {
        require!(
            base <= OVERFLOW_GUARD && exp <= OVERFLOW_GUARD,
            MathError::PrecisionOverflow
        );

        if exp.is_zero() {
            // 0^0 is taken to equal one, like anything else to the zeroth
            return Ok(self.rone());
        }
        if base.is_zero() {
            return Ok(U256::zero());
        }

        let frac = self.fpart(exp);
        let whole = exp - frac;

        let whole_pow = self.rpowi(base, self.to_int(whole))?;

        let frac_pow = if base < self.rone() {
            let inverted = self.rdiv(self.rone(), base)?;
            let new_exp = self.rmul(frac, self.ln(inverted, self.rone())?)?;
            self.rdiv(self.rone(), self.rpowe(new_exp)?)?
        } else {
            let new_exp = self.rmul(frac, self.ln(base, self.rone())?)?;
            self.rpowe(new_exp)?
        };

        let res = self.rmul(whole_pow, frac_pow)?;
        require!(res <= OVERFLOW_GUARD, MathError::PrecisionOverflow);
        Ok(res)
    }
}

fn is_odd(value: U256) -> bool {
    !(value & U256::one()).is_zero()
}
