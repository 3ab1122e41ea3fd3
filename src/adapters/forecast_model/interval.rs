//! Uncertainty intervals from residual spread.

/// Two-sided normal z-score covering `interval_width` of the mass.
///
/// `interval_width` must lie strictly between 0 and 1.
pub fn z_score(interval_width: f64) -> f64 {
    inverse_normal_cdf(0.5 + interval_width / 2.0)
}

/// Acklam's rational approximation, relative error below 1.2e-9.
fn inverse_normal_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    }
}

/// Population standard deviation of residuals; zero for fewer than two.
pub fn residual_std(residuals: &[f64]) -> f64 {
    if residuals.len() < 2 {
        return 0.0;
    }
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    let variance = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalBand {
    half_width: f64,
}

impl IntervalBand {
    pub fn new(interval_width: f64, sigma: f64) -> Self {
        Self {
            half_width: z_score(interval_width) * sigma,
        }
    }

    /// Bounds around `yhat`, widened by the square root of years ahead.
    /// History dates (zero or negative years ahead) use the base width.
    pub fn bounds(&self, yhat: f64, years_ahead: f64) -> (f64, f64) {
        let spread = self.half_width * years_ahead.max(1.0).sqrt();
        (yhat - spread, yhat + spread)
    }
}
