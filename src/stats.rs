//! # Stats
//!
//! $$
//! \bar x,\quad \sigma_{pop},\quad \rho_1=\mathrm{corr}(x_{0..n-1},x_{1..n})
//! $$
//!
//! Descriptive reductions over return series, written as explicit sums so the
//! estimator depends only on the formulas and not on a numeric backend.

use ndarray::Array1;

/// Variance below this level is treated as exactly zero when correlating.
const VARIANCE_FLOOR: f64 = 1e-24;

pub fn mean(x: &Array1<f64>) -> f64 {
  if x.is_empty() {
    return 0.0;
  }
  x.iter().sum::<f64>() / x.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std(x: &Array1<f64>) -> f64 {
  if x.is_empty() {
    return 0.0;
  }
  let m = mean(x);
  let var = x.iter().map(|v| (v - m).powi(2)).sum::<f64>() / x.len() as f64;
  var.sqrt()
}

/// Lag-1 Pearson autocorrelation between `x[..n-1]` and `x[1..]`.
///
/// Each lagged window uses its own mean and variance. A window with
/// (numerically) zero variance has no defined correlation; `0.0` is returned
/// so downstream clamps take over instead of propagating a NaN.
pub fn lag1_autocorrelation(x: &Array1<f64>) -> f64 {
  let n = x.len();
  if n < 3 {
    return 0.0;
  }

  let lead = x.slice(ndarray::s![..n - 1]);
  let lag = x.slice(ndarray::s![1..]);
  let m = (n - 1) as f64;

  let mean_lead = lead.iter().sum::<f64>() / m;
  let mean_lag = lag.iter().sum::<f64>() / m;

  let mut cov = 0.0;
  let mut var_lead = 0.0;
  let mut var_lag = 0.0;
  for (a, b) in lead.iter().zip(lag.iter()) {
    let da = a - mean_lead;
    let db = b - mean_lag;
    cov += da * db;
    var_lead += da * da;
    var_lag += db * db;
  }

  if var_lead <= VARIANCE_FLOOR || var_lag <= VARIANCE_FLOOR {
    return 0.0;
  }

  cov / (var_lead.sqrt() * var_lag.sqrt())
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn mean_of_known_vector() {
    let x = array![1.0, 2.0, 3.0, 4.0];
    assert_relative_eq!(mean(&x), 2.5);
  }

  #[test]
  fn mean_of_empty_is_zero() {
    let x = Array1::<f64>::zeros(0);
    assert_eq!(mean(&x), 0.0);
  }

  #[test]
  fn population_std_of_known_vector() {
    // var = ((-1)^2 + 0 + 1^2) / 3 = 2/3
    let x = array![1.0, 2.0, 3.0];
    assert_relative_eq!(population_std(&x), (2.0_f64 / 3.0).sqrt());
  }

  #[test]
  fn population_std_of_constant_vector_is_zero() {
    let x = Array1::from_elem(50, 0.25);
    assert_relative_eq!(population_std(&x), 0.0);
  }

  #[test]
  fn lag1_of_alternating_vector_is_negative_one() {
    let x = array![1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
    assert_relative_eq!(lag1_autocorrelation(&x), -1.0, epsilon = 1e-12);
  }

  #[test]
  fn lag1_of_linear_ramp_is_one() {
    let x = Array1::linspace(0.0, 1.0, 64);
    assert_relative_eq!(lag1_autocorrelation(&x), 1.0, epsilon = 1e-9);
  }

  #[test]
  fn lag1_of_constant_vector_is_zero() {
    let x = Array1::from_elem(50, 3.0);
    assert_eq!(lag1_autocorrelation(&x), 0.0);
  }

  #[test]
  fn lag1_of_short_vector_is_zero() {
    let x = array![1.0, 2.0];
    assert_eq!(lag1_autocorrelation(&x), 0.0);
  }
}
