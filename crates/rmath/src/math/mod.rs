pub mod fixedpoint;
pub mod logexpmath;

#[cfg(test)]
mod tests_log_exp_composition {
    use super::fixedpoint::FixedPoint;
    use primitive_types::U256;

    const MATH: FixedPoint = FixedPoint::DEFAULT;

    fn to_f64(value: U256) -> f64 {
        let U256(words) = value;
        words
            .iter()
            .enumerate()
            .map(|(i, &w)| w as f64 * 2f64.powi(64 * i as i32))
            .sum()
    }

    /// ln and rpowe invert each other to within a few units across the
    /// whole representable exponent range.
    #[test]
    fn test_ln_rpowe_roundtrip() {
        let one = MATH.rone();
        let cases = [
            one >> 5u32,
            one >> 1u32,
            one,
            U256::from(3u64) * one,
            U256::from(10u64) * one + (one >> 3u32),
            U256::from(50u64) * one,
            U256::from(100u64) * one,
            U256::from(110u64) * one,
        ];
        for x in cases {
            let exp = MATH.rpowe(x).unwrap();
            let back = MATH.ln(exp, one).unwrap();
            let diff = if back > x { back - x } else { x - back };
            // a couple of units of series rounding plus the ln 2 truncation
            assert!(diff <= U256::from(16u64), "x={} back={}", x, back);
        }
    }

    /// rpow against a binary64 reference over several orders of magnitude
    /// of both base and exponent.
    #[test]
    fn test_rpow_against_float_reference() {
        let one_f = to_f64(MATH.rone());
        let cases: [(f64, f64); 8] = [
            (1.5, 2.5),
            (10.0, 3.25),
            (123.456, 0.75),
            (2.0, 64.0),
            (1.000001, 1000.0),
            (0.3, 7.5),
            (0.999, 250.0),
            (1_000_000.0, 5.5),
        ];
        for (base, exp) in cases {
            let base_fp = U256::from((base * one_f) as u128);
            let exp_fp = U256::from((exp * one_f) as u128);
            let res = MATH.rpow(base_fp, exp_fp).unwrap();

            let expected = (to_f64(base_fp) / one_f).powf(to_f64(exp_fp) / one_f) * one_f;
            let diff = (to_f64(res) - expected).abs();
            assert!(
                diff <= expected * 1e-8 + 5.0,
                "base={} exp={} res={} expected={}",
                base,
                exp,
                to_f64(res),
                expected
            );
        }
    }

    /// The whole-power and fractional-power paths agree where they meet:
    /// stepping the exponent across an integer boundary stays monotone.
    #[test]
    fn test_rpow_integer_boundary_is_smooth() {
        let one = MATH.rone();
        let base = U256::from(3u64) * one;
        let below = U256::from(2u64) * one - U256::one();
        let at = U256::from(2u64) * one;
        let above = U256::from(2u64) * one + U256::one();

        let r_below = MATH.rpow(base, below).unwrap();
        let r_at = MATH.rpow(base, at).unwrap();
        let r_above = MATH.rpow(base, above).unwrap();
        assert!(r_below <= r_at);
        assert!(r_at <= r_above);
    }
}
