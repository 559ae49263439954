//! Normal-distribution helpers shared by the pricing engines.

use std::f64::consts::SQRT_2;

use statrs::function::erf::erfc;

/// Standard normal CDF via the complementary error function.
///
/// `erfc` keeps full relative precision in the lower tail where `1 + erf` would cancel.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// NIST reference values for the standard normal CDF.
    const CDF_REFERENCE: &[(f64, f64)] = &[
        (-3.0, 0.001_349_898_031_630_094_6),
        (-2.0, 0.022_750_131_948_179_21),
        (-1.0, 0.158_655_253_931_457_02),
        (-0.5, 0.308_537_538_725_986_9),
        (0.0, 0.5),
        (0.5, 0.691_462_461_274_013_1),
        (1.0, 0.841_344_746_068_542_9),
        (2.0, 0.977_249_868_051_820_8),
        (3.0, 0.998_650_101_968_370),
    ];

    #[test]
    fn normal_cdf_sanity() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_relative_eq!(normal_cdf(-1.0), 1.0 - normal_cdf(1.0), epsilon = 1e-14);
    }

    #[test]
    fn normal_cdf_matches_nist_within_one_e_minus_twelve() {
        for &(x, expected) in CDF_REFERENCE {
            let err = (normal_cdf(x) - expected).abs();
            assert!(err <= 1.0e-12, "x={x} expected={expected} err={err}");
        }
    }

    #[test]
    fn normal_cdf_lower_tail_keeps_relative_precision() {
        // Phi(-10) = 7.619853024160527e-24
        assert_relative_eq!(normal_cdf(-10.0), 7.619_853_024_160_527e-24, max_relative = 1e-9);
        assert_eq!(normal_cdf(40.0), 1.0);
    }
}
