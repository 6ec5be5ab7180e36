//! Statistics helpers for goodness-of-fit testing.
//!
//! The chi-square survival function is evaluated through the regularized
//! upper incomplete gamma function, `P(X >= x) = Q(k / 2, x / 2)` for `k`
//! degrees of freedom. `Q` uses a series expansion when `x < a + 1` and a
//! continued fraction (modified Lentz) otherwise.

use std::f64::consts::PI;

const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_8; // 0.5 * ln(2*pi)
const LANCZOS_G: f64 = 7.0;
#[allow(clippy::excessive_precision)] // published Lanczos coefficients
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

const GAMMAINC_MAX_ITERS: usize = 200;
const GAMMAINC_EPS: f64 = 3.0e-12;
const GAMMAINC_FPMIN: f64 = 1.0e-30;

/// Natural log of the Gamma function, with reflection below 0.5.
pub fn log_gamma(z: f64) -> f64 {
    if z.is_nan() || z == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if z == f64::INFINITY {
        return f64::INFINITY;
    }
    if z <= 0.0 && (z - z.round()).abs() < 1e-15 {
        return f64::NAN;
    }
    if z < 0.5 {
        let sin_pi = (PI * z).sin();
        return PI.ln() - sin_pi.abs().ln() - log_gamma(1.0 - z);
    }

    let z_minus = z - 1.0;
    let mut x = LANCZOS_COEFFS[0];
    for (i, coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        x += coeff / (z_minus + i as f64);
    }
    let t = z_minus + LANCZOS_G + 0.5;
    LOG_SQRT_2PI + (z_minus + 0.5) * t.ln() - t + x.ln()
}

/// Regularized lower incomplete gamma function P(a, x).
pub fn gamma_p(a: f64, x: f64) -> f64 {
    if a.is_nan() || x.is_nan() || a <= 0.0 || x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    if x < a + 1.0 {
        gammainc_series(a, x)
    } else {
        1.0 - gammainc_cf(a, x)
    }
}

/// Regularized upper incomplete gamma function Q(a, x) = 1 - P(a, x).
pub fn gamma_q(a: f64, x: f64) -> f64 {
    if a.is_nan() || x.is_nan() || a <= 0.0 || x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return 1.0;
    }
    if x.is_infinite() {
        return 0.0;
    }
    if x < a + 1.0 {
        1.0 - gammainc_series(a, x)
    } else {
        gammainc_cf(a, x)
    }
}

fn gammainc_series(a: f64, x: f64) -> f64 {
    let log_prefactor = a * x.ln() - x - log_gamma(a);

    let mut term = 1.0 / a;
    let mut sum = term;
    for n in 1..=GAMMAINC_MAX_ITERS {
        term *= x / (a + n as f64);
        sum += term;
        if term.abs() < GAMMAINC_EPS * sum.abs() {
            break;
        }
    }

    (log_prefactor.exp() * sum).clamp(0.0, 1.0)
}

fn gammainc_cf(a: f64, x: f64) -> f64 {
    let log_prefactor = a * x.ln() - x - log_gamma(a);

    let mut b = x - a + 1.0;
    let mut c = 1.0 / GAMMAINC_FPMIN;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=GAMMAINC_MAX_ITERS {
        let ai = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = ai * d + b;
        if d.abs() < GAMMAINC_FPMIN {
            d = GAMMAINC_FPMIN;
        }
        c = b + ai / c;
        if c.abs() < GAMMAINC_FPMIN {
            c = GAMMAINC_FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < GAMMAINC_EPS {
            break;
        }
    }

    (log_prefactor.exp() * h).clamp(0.0, 1.0)
}

/// Upper tail probability of the chi-square distribution.
pub fn chi_square_survival(statistic: f64, degrees_of_freedom: u32) -> f64 {
    if statistic.is_nan() || degrees_of_freedom == 0 {
        return f64::NAN;
    }
    if statistic <= 0.0 {
        return 1.0;
    }
    gamma_q(f64::from(degrees_of_freedom) / 2.0, statistic / 2.0)
}

/// Pearson's statistic `sum((observed - expected)^2 / expected)`.
///
/// Buckets with a non-positive expected count are skipped.
pub fn chi_square_statistic(observed: &[f64], expected: &[f64]) -> f64 {
    observed
        .iter()
        .zip(expected)
        .filter(|(_, exp)| **exp > 0.0)
        .map(|(obs, exp)| (obs - exp).powi(2) / exp)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn log_gamma_matches_factorials() {
        // Gamma(n) = (n - 1)!
        assert!(approx_eq(log_gamma(1.0), 0.0, 1e-12));
        assert!(approx_eq(log_gamma(5.0), 24f64.ln(), 1e-10));
        assert!(approx_eq(log_gamma(0.5), PI.sqrt().ln(), 1e-10));
        assert!(log_gamma(0.0).is_nan());
    }

    #[test]
    fn incomplete_gamma_halves_sum_to_one() {
        for &(a, x) in &[(0.5, 0.2), (4.0, 2.0), (4.0, 9.0), (10.0, 30.0)] {
            assert!(approx_eq(gamma_p(a, x) + gamma_q(a, x), 1.0, 1e-10));
        }
    }

    #[test]
    fn exponential_special_case() {
        // Q(1, x) = exp(-x)
        assert!(approx_eq(gamma_q(1.0, 0.7), (-0.7f64).exp(), 1e-10));
        assert!(approx_eq(gamma_q(1.0, 3.0), (-3.0f64).exp(), 1e-10));
    }

    #[test]
    fn chi_square_survival_matches_critical_values() {
        // 8 degrees of freedom: 5% at 15.507, 1% at 20.090
        assert!(approx_eq(chi_square_survival(15.507, 8), 0.05, 1e-4));
        assert!(approx_eq(chi_square_survival(20.090, 8), 0.01, 1e-4));
        // 2 degrees of freedom has closed form exp(-x / 2)
        assert!(approx_eq(chi_square_survival(3.0, 2), (-1.5f64).exp(), 1e-10));
    }

    #[test]
    fn chi_square_survival_bounds() {
        assert_eq!(chi_square_survival(0.0, 8), 1.0);
        assert!(chi_square_survival(1_000.0, 8) < 1e-100);
        assert!(chi_square_survival(1.0, 0).is_nan());
    }

    #[test]
    fn pearson_statistic() {
        let observed = [10.0, 20.0, 30.0];
        let expected = [20.0, 20.0, 20.0];
        assert!(approx_eq(chi_square_statistic(&observed, &expected), 10.0, 1e-12));
        assert_eq!(chi_square_statistic(&expected, &expected), 0.0);
    }
}
