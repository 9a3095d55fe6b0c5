use thiserror::Error;

/// Typed failures of the fixed-point core.
///
/// Every operation is pure and deterministic, so none of these are
/// retryable; the caller's only recovery is rejecting the offending input
/// at its own boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// `rdiv`, or a quotient built on it, was called with a zero
    /// denominator.
    #[error("division by zero")]
    DivideByZero,

    /// A zero argument where the operation requires strictly positive
    /// input, a ratio below one handed to a logarithm, or a configuration
    /// value outside its supported range.
    #[error("argument outside the operation domain")]
    Domain,

    /// An input, intermediate, or result exceeded the overflow guard, or a
    /// 512-bit intermediate no longer fits the 256-bit working width.
    #[error("magnitude exceeds the overflow guard")]
    PrecisionOverflow,

    /// The exponential series hit its iteration ceiling without collapsing
    /// to a zero term.
    #[error("exponential series did not converge")]
    NonConvergence,
}

pub type Result<T> = core::result::Result<T, MathError>;

macro_rules! require {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}
pub(crate) use require;
