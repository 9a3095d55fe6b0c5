use primitive_types::U256;

use crate::error::{require, MathError, Result};
use crate::math::fixedpoint::FixedPoint;

// Shape parameter of the decay curve, 3.14, kept as the exact rational
// 314/100 so the schedule never touches a float.
const STEEPNESS_NUMERATOR: u64 = 314;
const STEEPNESS_DENOMINATOR: u64 = 100;

/// Time-decaying weight schedule for a two-token market.
///
/// The market duration is divided into `segments` equal slices. `alpha`,
/// the weight of the decaying side, starts at one half and drifts to zero
/// at expiry following
///
///   alpha[t+1] = alpha[t] - eps(t)
///   eps(t)     = alpha*beta*(1 - R(t)) / (R(t)*alpha + beta),  beta = 1 - alpha
///   R(t)       = ln(s*(1 - (t+1)/N) + 1) / ln(s*(1 - t/N) + 1),  s = 3.14
///
/// The logarithm arguments are exact integer rationals
/// (314*(N - t) + 100*N) / (100*N) evaluated with the integer `ln`, so two
/// machines always derive bit-identical schedules.
#[derive(Debug, Clone)]
pub struct WeightCurve {
    math: FixedPoint,
    alpha: Vec<U256>,
}

impl WeightCurve {
    /// Precomputes the whole schedule for `segments` slices.
    pub fn new(math: FixedPoint, segments: u32) -> Result<WeightCurve> {
        require!(segments > 0, MathError::Domain);

        // ln of the curve value at each segment boundary; the last entry is
        // ln(1) = 0, which drives alpha to zero exactly at expiry
        let denom = U256::from(STEEPNESS_DENOMINATOR) * U256::from(segments);
        let mut step_ln = Vec::with_capacity(segments as usize + 1);
        for t in 0..=segments {
            let p = U256::from(STEEPNESS_NUMERATOR) * U256::from(segments - t) + denom;
            step_ln.push(math.ln(p, denom)?);
        }

        let one = math.rone();
        let mut alpha = Vec::with_capacity(segments as usize + 1);
        alpha.push(one >> 1u32); // both sides start at equal weight
        for t in 1..=segments as usize {
            let prev = alpha[t - 1];
            let beta = one - prev;
            let r = math.rdiv(step_ln[t], step_ln[t - 1])?;
            let numer = math.rmul(math.rmul(prev, beta)?, math.complement(r))?;
            let denom_fp = math
                .rmul(r, prev)?
                .checked_add(beta)
                .ok_or(MathError::PrecisionOverflow)?;
            let eps = math.rdiv(numer, denom_fp)?;
            // eps never exceeds alpha analytically; a unit of rounding may
            let next = prev.checked_sub(eps).unwrap_or(U256::zero());
            alpha.push(next);
        }

        Ok(WeightCurve { math, alpha })
    }

    pub fn segments(&self) -> u32 {
        self.alpha.len() as u32 - 1
    }

    /// Weight pair (growing side, decaying side) after `segment` elapsed
    /// slices. The two always sum to exactly one.
    pub fn weights_at(&self, segment: u32) -> Result<(U256, U256)> {
        let alpha = self
            .alpha
            .get(segment as usize)
            .copied()
            .ok_or(MathError::Domain)?;
        Ok((self.math.rone() - alpha, alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATH: FixedPoint = FixedPoint::DEFAULT;

    #[test]
    fn test_rejects_zero_segments() {
        assert_eq!(WeightCurve::new(MATH, 0).unwrap_err(), MathError::Domain);
    }

    #[test]
    fn test_starts_at_even_split() {
        let curve = WeightCurve::new(MATH, 16).unwrap();
        let (growing, decaying) = curve.weights_at(0).unwrap();
        assert_eq!(growing, MATH.rone() >> 1u32);
        assert_eq!(decaying, MATH.rone() >> 1u32);
    }

    #[test]
    fn test_decays_monotonically_to_zero() {
        let curve = WeightCurve::new(MATH, 64).unwrap();
        let mut prev = MATH.rone();
        for t in 0..=64 {
            let (growing, decaying) = curve.weights_at(t).unwrap();
            assert!(decaying < prev, "t={}", t);
            assert_eq!(growing + decaying, MATH.rone());
            prev = decaying;
        }
        // expired: the decaying side is gone up to a unit of rounding
        let (_, last) = curve.weights_at(64).unwrap();
        assert!(last <= U256::from(2u64), "residual alpha {}", last);
    }

    #[test]
    fn test_past_expiry_is_rejected() {
        let curve = WeightCurve::new(MATH, 8).unwrap();
        assert_eq!(curve.weights_at(9).unwrap_err(), MathError::Domain);
        assert_eq!(curve.segments(), 8);
    }

    #[test]
    fn test_schedule_is_deterministic() {
        let a = WeightCurve::new(MATH, 32).unwrap();
        let b = WeightCurve::new(MATH, 32).unwrap();
        for t in 0..=32 {
            assert_eq!(a.weights_at(t).unwrap(), b.weights_at(t).unwrap());
        }
    }

    #[test]
    fn test_matches_float_model() {
        // the binary64 rendition of the same recursion, accurate to well
        // past the asserted tolerance
        let n = 48u32;
        let curve = WeightCurve::new(MATH, n).unwrap();
        let mut alpha = 0.5f64;
        let one = 2f64.powi(40);
        for t in 1..=n {
            let cur = |t: u32| (3.14 * (1.0 - t as f64 / n as f64) + 1.0).ln();
            let r = cur(t) / cur(t - 1);
            let beta = 1.0 - alpha;
            alpha -= alpha * beta * (1.0 - r) / (r * alpha + beta);
            let (_, decaying) = curve.weights_at(t).unwrap();
            let got = {
                let U256(words) = decaying;
                words
                    .iter()
                    .enumerate()
                    .map(|(i, &w)| w as f64 * 2f64.powi(64 * i as i32))
                    .sum::<f64>()
            } / one;
            assert!((got - alpha).abs() < 1e-6, "t={} got={} want={}", t, got, alpha);
        }
    }
}
