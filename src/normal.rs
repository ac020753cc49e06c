//! Standard normal CDF and its inverse.
//!
//! Φ feeds the conditional default probability of every draw, so it is kept
//! branch-light and allocation-free. Φ⁻¹ is only used once per run to turn a
//! probability of default into a latent-asset threshold.

/// Complementary error function, Abramowitz & Stegun 7.1.26.
///
/// Absolute error below 1.5e-7 for all x.
#[inline]
fn erfc(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + P * abs_x);
    let poly = A1 + t * (A2 + t * (A3 + t * (A4 + t * A5)));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    if x < 0.0 { 2.0 - erfc_abs } else { erfc_abs }
}

/// Standard normal cumulative distribution function Φ(x) = P(X ≤ x).
///
/// Returns a value in `[0, 1]` for every non-NaN input, including ±∞.
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    (0.5 * erfc(-x / std::f64::consts::SQRT_2)).clamp(0.0, 1.0)
}

/// Inverse standard normal CDF Φ⁻¹(u) (Beasley-Springer-Moro).
///
/// Returns `None` unless `0 < u < 1`.
pub fn norm_inv(u: f64) -> Option<f64> {
    if !(u > 0.0 && u < 1.0) {
        return None;
    }

    const A: [f64; 4] = [
        2.506_628_238_84,
        -18.615_000_625_29,
        41.391_197_735_34,
        -25.441_060_496_37,
    ];
    const B: [f64; 4] = [
        -8.473_510_930_90,
        23.083_367_437_43,
        -21.062_241_018_26,
        3.130_829_098_33,
    ];
    const C: [f64; 9] = [
        0.337_475_482_272_614_7,
        0.976_169_019_091_718_6,
        0.160_797_971_491_820_9,
        0.027_643_881_033_386_3,
        0.003_840_572_937_360_9,
        0.000_395_189_651_191_9,
        0.000_032_176_788_176_8,
        0.000_000_288_816_736_4,
        0.000_000_396_031_518_7,
    ];

    let y = u - 0.5;
    if y.abs() < 0.42 {
        let r = y * y;
        let num = A[0] + r * (A[1] + r * (A[2] + r * A[3]));
        let den = 1.0 + r * (B[0] + r * (B[1] + r * (B[2] + r * B[3])));
        return Some(y * num / den);
    }

    let tail = if y > 0.0 { 1.0 - u } else { u };
    let r = (-tail.ln()).ln();
    let x = C
        .iter()
        .rev()
        .copied()
        .reduce(|acc, c| c + r * acc)
        .unwrap_or_default();
    Some(if y < 0.0 { -x } else { x })
}
