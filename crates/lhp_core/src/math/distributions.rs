//! Standard normal distribution functions.
//!
//! This module provides double-precision implementations of:
//! - `norm_pdf`: Probability density function φ
//! - `norm_cdf`: Cumulative distribution function Φ
//! - `norm_inv_cdf`: Inverse cumulative distribution function Φ⁻¹
//! - `bivariate_norm_cdf`: Standard bivariate normal CDF M(x, y; ρ)
//!
//! `norm_pdf` and `norm_cdf` are generic over `T: Float`. The inverse and the
//! bivariate CDF work on `f64` only.
//!
//! # Accuracy
//!
//! | Function | Absolute error |
//! |---|---|
//! | `norm_cdf` | < 1e-14 |
//! | `norm_inv_cdf` | < 1e-9 on (0, 1) |
//! | `bivariate_norm_cdf` | < 1e-12 for \|ρ\| ≤ 1 |

use num_traits::Float;
use std::f64::consts::PI;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// sqrt(2 * pi)
const SQRT_2PI: f64 = 2.506_628_274_631_000_7;

/// |x| beyond which Φ(x) is 0 or 1 in double precision.
const CDF_CUTOFF: f64 = 37.0;

/// Switch point between the rational and the continued-fraction branch.
const CDF_RATIONAL_LIMIT: f64 = 7.071_067_811_865_47;

/// Hart (1968) numerator coefficients, highest order first.
const HART_P: [f64; 7] = [
    3.526_249_659_989_11e-2,
    0.700_383_064_443_688,
    6.373_962_203_531_65,
    33.912_866_078_383,
    112.079_291_497_871,
    221.213_596_169_931,
    220.206_867_912_376,
];

/// Hart (1968) denominator coefficients, highest order first.
const HART_Q: [f64; 8] = [
    8.838_834_764_831_84e-2,
    1.755_667_163_182_64,
    16.064_177_579_207,
    86.780_732_202_946_1,
    296.564_248_779_674,
    637.333_633_378_831,
    793.826_512_519_948,
    440.413_735_824_752,
];

/// Standard normal probability density function.
///
/// # Mathematical Definition
/// φ(x) = (1 / sqrt(2π)) * exp(-x² / 2)
///
/// # Examples
/// ```
/// use lhp_core::math::distributions::norm_pdf;
///
/// let pdf_0 = norm_pdf(0.0_f64);
/// assert!((pdf_0 - 0.3989422804014327).abs() < 1e-15);
/// ```
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let frac_1_sqrt_2pi = T::from(FRAC_1_SQRT_2PI).unwrap();
    let half = T::from(0.5).unwrap();
    frac_1_sqrt_2pi * (-half * x * x).exp()
}

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= x) for X ~ N(0, 1) with the Hart (1968) rational
/// approximation for |x| < 7.07 and a continued fraction in the tail,
/// as laid out in West (2005), "Better approximations to cumulative
/// normal functions".
///
/// # Returns
/// Probability in [0, 1]. Exactly 0 below -37 and exactly 1 above 37.
///
/// # Examples
/// ```
/// use lhp_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-15);
/// assert!((norm_cdf(1.0_f64) - 0.8413447460685429).abs() < 1e-14);
/// ```
pub fn norm_cdf<T: Float>(x: T) -> T {
    let zero = T::zero();
    let one = T::one();
    let abs_x = x.abs();

    let tail = if abs_x > T::from(CDF_CUTOFF).unwrap() {
        zero
    } else {
        let exponential = (-abs_x * abs_x / T::from(2.0).unwrap()).exp();
        if abs_x < T::from(CDF_RATIONAL_LIMIT).unwrap() {
            let numerator = HART_P
                .iter()
                .fold(zero, |acc, &c| acc * abs_x + T::from(c).unwrap());
            let denominator = HART_Q
                .iter()
                .fold(zero, |acc, &c| acc * abs_x + T::from(c).unwrap());
            exponential * numerator / denominator
        } else {
            let mut build = abs_x + T::from(0.65).unwrap();
            for k in [4.0, 3.0, 2.0, 1.0] {
                build = abs_x + T::from(k).unwrap() / build;
            }
            exponential / build / T::from(SQRT_2PI).unwrap()
        }
    };

    if x > zero {
        one - tail
    } else {
        tail
    }
}

/// Acklam central-region numerator coefficients.
const ACKLAM_A: [f64; 6] = [
    -3.969_683_028_665_376e+01,
    2.209_460_984_245_205e+02,
    -2.759_285_104_469_687e+02,
    1.383_577_518_672_690e+02,
    -3.066_479_806_614_716e+01,
    2.506_628_277_459_239e+00,
];

/// Acklam central-region denominator coefficients.
const ACKLAM_B: [f64; 5] = [
    -5.447_609_879_822_406e+01,
    1.615_858_368_580_409e+02,
    -1.556_989_798_598_866e+02,
    6.680_131_188_771_972e+01,
    -1.328_068_155_288_572e+01,
];

/// Acklam tail-region numerator coefficients.
const ACKLAM_C: [f64; 6] = [
    -7.784_894_002_430_293e-03,
    -3.223_964_580_411_365e-01,
    -2.400_758_277_161_838e+00,
    -2.549_732_539_343_734e+00,
    4.374_664_141_464_968e+00,
    2.938_163_982_698_783e+00,
];

/// Acklam tail-region denominator coefficients.
const ACKLAM_D: [f64; 4] = [
    7.784_695_709_041_462e-03,
    3.224_671_290_700_398e-01,
    2.445_134_137_142_996e+00,
    3.754_408_661_907_416e+00,
];

/// Lower bound of the Acklam central region.
const ACKLAM_P_LOW: f64 = 0.02425;

#[inline]
fn acklam_tail(q: f64) -> f64 {
    let [c0, c1, c2, c3, c4, c5] = ACKLAM_C;
    let [d0, d1, d2, d3] = ACKLAM_D;
    (((((c0 * q + c1) * q + c2) * q + c3) * q + c4) * q + c5)
        / ((((d0 * q + d1) * q + d2) * q + d3) * q + 1.0)
}

/// Inverse standard normal cumulative distribution function.
///
/// Peter Acklam's rational approximation (relative error 1.15e-9) followed
/// by one Halley refinement step against [`norm_cdf`]. The refined result
/// inherits the accuracy of `norm_cdf`: about 1e-14 in the body and below
/// 1e-9 in the far tails.
///
/// # Domain
/// - `p == 0` returns `-inf`, `p == 1` returns `+inf`
/// - `p` outside [0, 1] or NaN returns NaN
///
/// # Examples
/// ```
/// use lhp_core::math::distributions::norm_inv_cdf;
///
/// assert!(norm_inv_cdf(0.5).abs() < 1e-15);
/// assert!((norm_inv_cdf(0.02) + 2.053748910631823).abs() < 1e-12);
/// assert!(norm_inv_cdf(1.5).is_nan());
/// ```
pub fn norm_inv_cdf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let x = if p < ACKLAM_P_LOW {
        acklam_tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - ACKLAM_P_LOW {
        let [a0, a1, a2, a3, a4, a5] = ACKLAM_A;
        let [b0, b1, b2, b3, b4] = ACKLAM_B;
        let q = p - 0.5;
        let r = q * q;
        (((((a0 * r + a1) * r + a2) * r + a3) * r + a4) * r + a5) * q
            / (((((b0 * r + b1) * r + b2) * r + b3) * r + b4) * r + 1.0)
    } else {
        -acklam_tail((-2.0 * (1.0 - p).ln()).sqrt())
    };

    // Halley step
    let e = norm_cdf(x) - p;
    let u = e * SQRT_2PI * (x * x / 2.0).exp();
    if !u.is_finite() {
        return x;
    }
    x - u / (1.0 + x * u / 2.0)
}

/// Gauss-Legendre abscissae on [-1, 0) for 6, 12 and 20 point rules.
const GL_NODES: [&[f64]; 3] = [
    &[-0.932_469_514_203_152, -0.661_209_386_466_265, -0.238_619_186_083_197],
    &[
        -0.981_560_634_246_719,
        -0.904_117_256_370_475,
        -0.769_902_674_194_305,
        -0.587_317_954_286_617,
        -0.367_831_498_998_18,
        -0.125_233_408_511_469,
    ],
    &[
        -0.993_128_599_185_095,
        -0.963_971_927_277_914,
        -0.912_234_428_251_326,
        -0.839_116_971_822_219,
        -0.746_331_906_460_151,
        -0.636_053_680_726_515,
        -0.510_867_001_950_827,
        -0.373_706_088_715_42,
        -0.227_785_851_141_645,
        -0.076_526_521_133_497_3,
    ],
];

/// Gauss-Legendre weights matching [`GL_NODES`].
const GL_WEIGHTS: [&[f64]; 3] = [
    &[0.171_324_492_379_17, 0.360_761_573_048_138, 0.467_913_934_572_69],
    &[
        0.047_175_336_386_511_8,
        0.106_939_325_995_318,
        0.160_078_328_543_346,
        0.203_167_426_723_066,
        0.233_492_536_538_355,
        0.249_147_045_813_403,
    ],
    &[
        0.017_614_007_139_152_1,
        0.040_601_429_800_386_9,
        0.062_672_048_334_109_1,
        0.083_276_741_576_704_8,
        0.101_930_119_817_24,
        0.118_194_531_961_518,
        0.131_688_638_449_177,
        0.142_096_109_318_382,
        0.149_172_986_472_604,
        0.152_753_387_130_726,
    ],
];

/// Standard bivariate normal cumulative distribution function.
///
/// Computes `P(X <= x, Y <= y)` where `(X, Y)` are standard normal with
/// correlation `rho`, following the Drezner-Wesolowsky (1990) scheme as
/// refined by Genz (2004): Gauss-Legendre quadrature of Plackett's
/// identity for |ρ| < 0.925 and an asymptotic expansion around |ρ| = 1
/// otherwise. The rule size grows with |ρ| (6, 12 or 20 nodes).
///
/// # Arguments
/// * `x` - Upper limit for the first variate
/// * `y` - Upper limit for the second variate
/// * `rho` - Correlation in [-1, 1]
///
/// # Examples
/// ```
/// use lhp_core::math::distributions::{bivariate_norm_cdf, norm_cdf};
///
/// // Independence factorises
/// let m = bivariate_norm_cdf(0.3, -1.2, 0.0);
/// assert!((m - norm_cdf(0.3) * norm_cdf(-1.2)).abs() < 1e-15);
/// ```
pub fn bivariate_norm_cdf(x: f64, y: f64, rho: f64) -> f64 {
    let abs_rho = rho.abs();
    let rule = if abs_rho < 0.3 {
        0
    } else if abs_rho < 0.75 {
        1
    } else {
        2
    };
    let nodes = GL_NODES[rule];
    let weights = GL_WEIGHTS[rule];

    let h = -x;
    let mut k = -y;
    let mut hk = h * k;
    let mut bvn = 0.0;

    if abs_rho < 0.925 {
        if abs_rho > 0.0 {
            let hs = (h * h + k * k) / 2.0;
            let asr = rho.asin();
            for (&node, &weight) in nodes.iter().zip(weights) {
                for sign in [-1.0, 1.0] {
                    let sn = (asr * (sign * node + 1.0) / 2.0).sin();
                    bvn += weight * ((sn * hk - hs) / (1.0 - sn * sn)).exp();
                }
            }
            bvn = bvn * asr / (4.0 * PI);
        }
        return bvn + norm_cdf(-h) * norm_cdf(-k);
    }

    if rho < 0.0 {
        k = -k;
        hk = -hk;
    }

    if abs_rho < 1.0 {
        let ass = (1.0 - rho) * (1.0 + rho);
        let mut a = ass.sqrt();
        let bs = (h - k) * (h - k);
        let c = (4.0 - hk) / 8.0;
        let d = (12.0 - hk) / 16.0;

        let asr = -(bs / ass + hk) / 2.0;
        if asr > -100.0 {
            bvn = a
                * asr.exp()
                * (1.0 - c * (bs - ass) * (1.0 - d * bs / 5.0) / 3.0 + c * d * ass * ass / 5.0);
        }
        if -hk < 100.0 {
            let b = bs.sqrt();
            bvn -= (-hk / 2.0).exp()
                * SQRT_2PI
                * norm_cdf(-b / a)
                * b
                * (1.0 - c * bs * (1.0 - d * bs / 5.0) / 3.0);
        }

        a /= 2.0;
        for (&node, &weight) in nodes.iter().zip(weights) {
            for sign in [-1.0, 1.0] {
                let xs = (a * (sign * node + 1.0)).powi(2);
                let rs = (1.0 - xs).sqrt();
                let asr = -(bs / xs + hk) / 2.0;
                if asr > -100.0 {
                    bvn += a
                        * weight
                        * asr.exp()
                        * ((-hk * (1.0 - rs) / (2.0 * (1.0 + rs))).exp() / rs
                            - (1.0 + c * xs * (1.0 + d * xs)));
                }
            }
        }
        bvn = -bvn / (2.0 * PI);
    }

    if rho > 0.0 {
        bvn + norm_cdf(-h.max(k))
    } else {
        let mut value = -bvn;
        if k > h {
            value += norm_cdf(k) - norm_cdf(h);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    // ==========================================================
    // norm_pdf tests
    // ==========================================================

    #[test]
    fn test_norm_pdf_reference_values() {
        assert_relative_eq!(norm_pdf(0.0_f64), FRAC_1_SQRT_2PI, epsilon = 1e-15);
        assert_relative_eq!(norm_pdf(1.0_f64), 0.24197072451914337, epsilon = 1e-15);
        assert_relative_eq!(norm_pdf(2.0_f64), 0.05399096651318806, epsilon = 1e-15);
    }

    #[test]
    fn test_norm_pdf_symmetry() {
        for x in [0.5, 1.0, 1.5, 2.0, 3.0] {
            assert_eq!(norm_pdf(x), norm_pdf(-x));
        }
    }

    // ==========================================================
    // norm_cdf tests
    // ==========================================================

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_abs_diff_eq!(norm_cdf(0.0_f64), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_cdf(1.0_f64), 0.8413447460685429, epsilon = 1e-14);
        assert_abs_diff_eq!(norm_cdf(-1.0_f64), 0.15865525393145707, epsilon = 1e-14);
        assert_abs_diff_eq!(norm_cdf(2.0_f64), 0.9772498680518208, epsilon = 1e-14);
        assert_abs_diff_eq!(norm_cdf(-2.0_f64), 0.022750131948179195, epsilon = 1e-14);
        assert_abs_diff_eq!(norm_cdf(3.0_f64), 0.9986501019683699, epsilon = 1e-14);
    }

    #[test]
    fn test_norm_cdf_deep_tail() {
        // Φ(-8) = 6.22096057427178e-16
        assert_relative_eq!(norm_cdf(-8.0_f64), 6.220960574271784e-16, max_relative = 1e-7);
        assert_eq!(norm_cdf(-40.0_f64), 0.0);
        assert_eq!(norm_cdf(40.0_f64), 1.0);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for i in -60..=60 {
            let x = i as f64 * 0.1;
            assert_abs_diff_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_norm_cdf_monotonic() {
        let values: Vec<f64> = (-80..=80).map(|i| i as f64 * 0.1).collect();
        for pair in values.windows(2) {
            assert!(norm_cdf(pair[1]) >= norm_cdf(pair[0]));
        }
    }

    #[test]
    fn test_norm_cdf_f32_compatibility() {
        assert!((norm_cdf(0.0_f32) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cdf_pdf_relationship() {
        let h = 1e-5;
        for x in [-2.0, -1.0, 0.0, 1.0, 2.0] {
            let derivative = (norm_cdf(x + h) - norm_cdf(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(derivative, norm_pdf(x), epsilon = 1e-9);
        }
    }

    // ==========================================================
    // norm_inv_cdf tests
    // ==========================================================

    #[test]
    fn test_norm_inv_cdf_reference_values() {
        assert_abs_diff_eq!(norm_inv_cdf(0.5), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_inv_cdf(0.975), 1.959963984540054, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_inv_cdf(0.02), -2.053748910631823, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_inv_cdf(0.05), -1.6448536269514729, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_inv_cdf(1e-10), -6.361340902404056, epsilon = 1e-9);
    }

    #[test]
    fn test_norm_inv_cdf_subnormal_tail() {
        let smallest = norm_inv_cdf(5e-324);
        assert!(smallest.is_finite());
        assert!(smallest < -37.5);
        assert!(smallest <= norm_inv_cdf(1e-310));
        assert_abs_diff_eq!(norm_inv_cdf(1e-310), -37.645, epsilon = 1e-2);
    }

    #[test]
    fn test_norm_inv_cdf_roundtrip() {
        for i in 1..1000 {
            let p = i as f64 / 1000.0;
            assert_abs_diff_eq!(norm_cdf(norm_inv_cdf(p)), p, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_norm_inv_cdf_domain() {
        assert_eq!(norm_inv_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(norm_inv_cdf(1.0), f64::INFINITY);
        assert!(norm_inv_cdf(-0.1).is_nan());
        assert!(norm_inv_cdf(1.1).is_nan());
        assert!(norm_inv_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn test_norm_inv_cdf_antisymmetry() {
        for p in [0.001, 0.01, 0.1, 0.3] {
            assert_abs_diff_eq!(norm_inv_cdf(p), -norm_inv_cdf(1.0 - p), epsilon = 1e-12);
        }
    }

    // ==========================================================
    // bivariate_norm_cdf tests
    // ==========================================================

    #[test]
    fn test_bivariate_origin_identity() {
        // M(0, 0; ρ) = 1/4 + asin(ρ) / (2π)
        for rho in [-0.99, -0.95, -0.5, -0.1, 0.0, 0.2, 0.5, 0.8, 0.93, 0.999] {
            let expected = 0.25 + rho.asin() / (2.0 * PI);
            assert_abs_diff_eq!(bivariate_norm_cdf(0.0, 0.0, rho), expected, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_bivariate_reference_values() {
        // Reference values from direct quadrature of φ(t) Φ((y - ρt) / sqrt(1 - ρ²))
        assert_abs_diff_eq!(
            bivariate_norm_cdf(-2.05, 1.2, -0.3),
            0.013920896914813715,
            epsilon = 1e-13
        );
        assert_abs_diff_eq!(
            bivariate_norm_cdf(1.0, 2.0, 0.95),
            0.8413361470328654,
            epsilon = 1e-13
        );
        assert_abs_diff_eq!(
            bivariate_norm_cdf(-1.0, 0.5, -0.95),
            0.002322899490085134,
            epsilon = 1e-13
        );
        assert_abs_diff_eq!(
            bivariate_norm_cdf(0.3, -0.2, 0.8),
            0.38898922278505416,
            epsilon = 1e-13
        );
        assert_abs_diff_eq!(
            bivariate_norm_cdf(-1.0, -1.0, 0.1),
            0.03132022049077513,
            epsilon = 1e-13
        );
    }

    #[test]
    fn test_bivariate_symmetric_in_arguments() {
        for rho in [-0.6, 0.4, 0.96] {
            assert_abs_diff_eq!(
                bivariate_norm_cdf(0.7, -0.4, rho),
                bivariate_norm_cdf(-0.4, 0.7, rho),
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_bivariate_perfect_correlation() {
        // ρ = 1: M(x, y) = Φ(min(x, y)); ρ = -1: M(x, y) = max(Φ(x) + Φ(y) - 1, 0)
        assert_abs_diff_eq!(bivariate_norm_cdf(0.5, -0.3, 1.0), norm_cdf(-0.3), epsilon = 1e-15);
        assert_abs_diff_eq!(
            bivariate_norm_cdf(0.5, 0.3, -1.0),
            norm_cdf(0.5) + norm_cdf(0.3) - 1.0,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(bivariate_norm_cdf(-0.5, 0.3, -1.0), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_bivariate_marginal_limit() {
        // y -> ∞ recovers the marginal
        for rho in [-0.5, 0.0, 0.5, 0.95] {
            assert_abs_diff_eq!(bivariate_norm_cdf(0.4, 40.0, rho), norm_cdf(0.4), epsilon = 1e-14);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn test_bivariate_frechet_bounds(
                x in -6.0..6.0_f64,
                y in -6.0..6.0_f64,
                rho in -1.0..1.0_f64
            ) {
                let m = bivariate_norm_cdf(x, y, rho);
                let upper = norm_cdf(x).min(norm_cdf(y));
                let lower = (norm_cdf(x) + norm_cdf(y) - 1.0).max(0.0);
                prop_assert!(m <= upper + 1e-12, "M = {} above {}", m, upper);
                prop_assert!(m >= lower - 1e-12, "M = {} below {}", m, lower);
            }

            #[test]
            fn test_inv_cdf_inverts_cdf(x in -7.5..3.0_f64) {
                let p = norm_cdf(x);
                prop_assert!((norm_inv_cdf(p) - x).abs() < 1e-9);
            }
        }
    }
}
