// SPDX-License-Identifier: MIT

use primitive_types::{U256, U512};
use static_assertions::const_assert;

use crate::error::{require, MathError, Result};

/// Upper bound on the magnitude of any value entering or leaving the
/// library. Exceeding it is surfaced as `PrecisionOverflow`, never a wrap.
// OVERFLOW_GUARD = 2^200
pub const OVERFLOW_GUARD: U256 = U256([0, 0, 0, 256]);

/// Default fractional-bit width. ONE = 2^40 = 1_099_511_627_776.
pub const DEFAULT_PRECISION_BITS: u32 = 40;

/// Largest supported fractional-bit width. The fractional-extraction loop
/// squares values just below 2*ONE, and that square must clear the 256-bit
/// working width with headroom.
pub const MAX_PRECISION_BITS: u32 = 124;

const_assert!(DEFAULT_PRECISION_BITS <= MAX_PRECISION_BITS);
const_assert!(2 * (MAX_PRECISION_BITS as usize + 1) < 256);

/**
 * @dev Immutable precision configuration together with the rounded
 * fixed-point primitives. An integer x represents the real number
 * x / 2^precision_bits; `rone` is the representation of 1.0.
 *
 * The configuration is constructed once and shared by copy; there is no
 * mutable state anywhere in the core, so every operation is safe to call
 * concurrently.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    precision_bits: u32,
    rone: U256,
}

impl FixedPoint {
    /// Reference configuration: 40 fractional bits.
    pub const DEFAULT: FixedPoint = FixedPoint {
        precision_bits: DEFAULT_PRECISION_BITS,
        // RONE = 2^40 = 1_099_511_627_776
        rone: U256([1u64 << DEFAULT_PRECISION_BITS, 0, 0, 0]),
    };

    /// Builds a configuration with the given fractional-bit width.
    /// Widths outside 1..=MAX_PRECISION_BITS are rejected.
    pub const fn new(precision_bits: u32) -> Result<FixedPoint> {
        if precision_bits == 0 || precision_bits > MAX_PRECISION_BITS {
            return Err(MathError::Domain);
        }
        let mut limbs = [0u64; 4];
        limbs[(precision_bits / 64) as usize] = 1u64 << (precision_bits % 64);
        Ok(FixedPoint {
            precision_bits,
            rone: U256(limbs),
        })
    }

    pub const fn precision_bits(&self) -> u32 {
        self.precision_bits
    }

    /// Fixed-point representation of the real value 1.0 (2^precision_bits).
    pub const fn rone(&self) -> U256 {
        self.rone
    }

    /**
     * @dev Rounded fixed-point multiplication: (ONE/2 + x*y) >> bits, so
     * ties round up. The product is taken in 512 bits and can never wrap;
     * a result that no longer fits the 256-bit working width is a
     * PrecisionOverflow.
     */
    pub fn rmul(&self, x: U256, y: U256) -> Result<U256> {
        let half = U512::from(self.rone >> 1u32);
        let product = x
            .full_mul(y)
            .checked_add(half)
            .ok_or(MathError::PrecisionOverflow)?;
        narrow(product >> self.precision_bits)
    }

    /**
     * @dev Rounded fixed-point division: (y/2 + x*ONE) / y with truncating
     * integer division. Fails with DivideByZero when y is zero.
     */
    pub fn rdiv(&self, x: U256, y: U256) -> Result<U256> {
        require!(!y.is_zero(), MathError::DivideByZero);
        let numerator = x
            .full_mul(self.rone)
            .checked_add(U512::from(y >> 1u32))
            .ok_or(MathError::PrecisionOverflow)?;
        narrow(numerator / U512::from(y))
    }

    /// Scales a plain integer up to fixed point.
    pub fn to_fp(&self, value: U256) -> Result<U256> {
        narrow(value.full_mul(self.rone))
    }

    /// Truncates a fixed-point value down to its integer part.
    pub fn to_int(&self, value: U256) -> U256 {
        value >> self.precision_bits
    }

    /// Fractional remainder of a fixed-point value.
    pub fn fpart(&self, value: U256) -> U256 {
        value % self.rone
    }

    /// Clamped complement ONE - x: zero when x is already at or above ONE,
    /// which strips rounding spill instead of underflowing.
    pub fn complement(&self, x: U256) -> U256 {
        if x < self.rone {
            self.rone - x
        } else {
            U256::zero()
        }
    }
}

/// Narrows a 512-bit intermediate back to the 256-bit working width.
pub(crate) fn narrow(value: U512) -> Result<U256> {
    let U512(ref words) = value;
    if words[4] | words[5] | words[6] | words[7] != 0 {
        return Err(MathError::PrecisionOverflow);
    }
    Ok(U256([words[0], words[1], words[2], words[3]]))
}
