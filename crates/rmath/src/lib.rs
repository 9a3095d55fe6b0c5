//! Deterministic, integer-only fixed-point math for time-weighted pools.
//!
//! The core is a set of pure functions over unsigned 256-bit fixed-point
//! values: rounded multiply/divide primitives, square-and-multiply integer
//! powers, base-2 and natural logarithm extraction, a capped exponential
//! series, and the arbitrary fractional power composed from them. Every
//! intermediate that can outgrow 256 bits runs through a 512-bit product
//! with an explicit narrowing check, so results are bit-exact across
//! platforms and out-of-range inputs fail with typed errors instead of
//! wrapping.
//!
//! On top of the core sit the market calculators: weighted-pool trade
//! quoting, the time-decaying weight schedule, and protocol-fee
//! reconciliation against the pool invariant.

pub mod error;
pub mod market;
pub mod math;

pub use error::{MathError, Result};
pub use market::pool::Pool;
pub use market::schedule::WeightCurve;
pub use market::swap::WeightedSwap;
pub use math::fixedpoint::{
    FixedPoint, DEFAULT_PRECISION_BITS, MAX_PRECISION_BITS, OVERFLOW_GUARD,
};
