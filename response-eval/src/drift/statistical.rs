//! Least squares trend fitting and Student's t significance

/// Lanczos approximation, g = 7
const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

const BETACF_MAX_ITER: usize = 200;
const BETACF_EPS: f64 = 1e-14;
const BETACF_TINY: f64 = 1e-300;

/// Ordinary least squares fit of y on x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation
    pub r: f64,
    pub r_squared: f64,
    /// Standard error of the slope
    pub std_err: f64,
}

/// Fit `y = slope * x + intercept`.
///
/// Returns `None` for mismatched or too short inputs and when x has no
/// variance. A constant y gives a zero slope and `r = 0`.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    if syy == 0.0 {
        return Some(LinearFit {
            slope: 0.0,
            intercept: mean_y,
            r: 0.0,
            r_squared: 0.0,
            std_err: 0.0,
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    let residual = (syy - slope * sxy).max(0.0);
    let std_err = if xs.len() > 2 {
        (residual / (n - 2.0) / sxx).sqrt()
    } else {
        0.0
    };

    Some(LinearFit {
        slope,
        intercept,
        r,
        r_squared: r * r,
        std_err,
    })
}

/// Two-sided p-value of `t` under Student's t with `df` degrees of freedom
pub fn t_test_p_value(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return 1.0;
    }
    if t.is_infinite() {
        return 0.0;
    }
    let x = df / (df + t * t);
    regularized_incomplete_beta(x, df / 2.0, 0.5).clamp(0.0, 1.0)
}

/// Natural log of the gamma function
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // reflection
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin().abs()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let mut a = LANCZOS_COEFFICIENTS[0];
    for (i, c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Regularized incomplete beta function `I_x(a, b)`
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln())
        .exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        front * betacf(x, a, b) / a
    } else {
        1.0 - front * betacf(1.0 - x, b, a) / b
    }
}

/// Continued fraction for the incomplete beta function (modified Lentz)
fn betacf(x: f64, a: f64, b: f64) -> f64 {
    let guard = |v: f64| if v.abs() < BETACF_TINY { BETACF_TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=BETACF_MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < BETACF_EPS {
            break;
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma() {
        assert!(ln_gamma(1.0).abs() < 1e-10);
        assert!(ln_gamma(2.0).abs() < 1e-10);
        assert!((ln_gamma(5.0) - 24f64.ln()).abs() < 1e-10);
        // Γ(1/2) = √π
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
        assert!((ln_gamma(0.25) - 3.625_609_908_221_908f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_incomplete_beta_bounds() {
        assert_eq!(regularized_incomplete_beta(0.0, 2.0, 3.0), 0.0);
        assert_eq!(regularized_incomplete_beta(1.0, 2.0, 3.0), 1.0);
        // I_x(1, 1) = x
        assert!((regularized_incomplete_beta(0.3, 1.0, 1.0) - 0.3).abs() < 1e-10);
        // symmetric case
        assert!((regularized_incomplete_beta(0.5, 0.5, 0.5) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_t_test_p_value() {
        assert!((t_test_p_value(2.228, 10.0) - 0.05).abs() < 1e-3);
        assert!((t_test_p_value(1.0, 1.0) - 0.5).abs() < 1e-10);
        assert!((t_test_p_value(-2.228, 10.0) - 0.05).abs() < 1e-3);
        assert_eq!(t_test_p_value(0.0, 5.0), 1.0);
        assert_eq!(t_test_p_value(f64::INFINITY, 5.0), 0.0);
        assert_eq!(t_test_p_value(f64::NAN, 5.0), 1.0);
        assert!(t_test_p_value(30.0, 8.0) < 1e-8);
    }

    #[test]
    fn test_linear_regression_exact_line() {
        let xs: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let fit = linear_regression(&xs, &ys).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r - 1.0).abs() < 1e-12);
        assert!(fit.std_err < 1e-6);
    }

    #[test]
    fn test_linear_regression_degenerate() {
        assert!(linear_regression(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(linear_regression(&[1.0], &[1.0]).is_none());
        assert!(linear_regression(&[1.0, 2.0], &[1.0]).is_none());

        let flat = linear_regression(&[0.0, 1.0, 2.0], &[75.0, 75.0, 75.0]).unwrap();
        assert_eq!(flat.slope, 0.0);
        assert_eq!(flat.r, 0.0);
        assert_eq!(flat.intercept, 75.0);
    }

    #[test]
    fn test_noisy_fit() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [1.0, 3.0, 2.0, 5.0, 4.0];
        let fit = linear_regression(&xs, &ys).unwrap();
        assert!((fit.slope - 0.8).abs() < 1e-12);
        assert!((fit.r - 0.8).abs() < 1e-12);
        assert!(fit.std_err > 0.0);
    }
}
