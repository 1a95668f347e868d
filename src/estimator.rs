//! # OU Parameter Estimator
//!
//! $$
//! \hat\theta=\mathrm{clamp}\!\left(\frac{-\ln|\rho_1|}{\Delta t},\,0.1,\,10\right),\qquad
//! \hat\sigma=\sigma_{emp}\sqrt{\frac{2\hat\theta}{1-e^{-2\hat\theta\Delta t}}}
//! $$
//!
//! Fits a mean-reverting log-price process to a price history. Every
//! parameter is pushed through a hard clamp; the clamps are the stability
//! design, not a cosmetic afterthought, and the returned record is only ever
//! inside the clamped ranges.

use ndarray::Array1;
use statrs::distribution::Normal;
use tracing::debug;

use crate::error::ForecastError;
use crate::error::Result;
use crate::stats;

/// Reversion-speed clamp range.
pub const THETA_MIN: f64 = 0.1;
pub const THETA_MAX: f64 = 10.0;
/// Volatility cap.
pub const SIGMA_MAX: f64 = 0.5;
/// Floor for `1 - exp(-2 theta dt)`; keeps the bias correction finite when
/// `theta * dt` underflows.
const CORRECTION_DENOM_FLOOR: f64 = 1e-12;

/// Bounded parameters of the mean-reverting log-price process.
///
/// Invariants: `theta` in `[0.1, 10.0]`, `sigma` in `[0, 0.5]`, `mu` finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessParameters {
  /// Reversion speed toward the long-run mean.
  pub theta: f64,
  /// Long-run mean of the log-price.
  pub mu: f64,
  /// Instantaneous volatility of the log-price.
  pub sigma: f64,
}

impl ProcessParameters {
  /// Long-run level in price space.
  pub fn equilibrium_price(&self) -> f64 {
    self.mu.exp()
  }

  /// Half-life of a deviation from the long-run mean, in the same time unit
  /// as `theta`.
  pub fn half_life(&self) -> f64 {
    std::f64::consts::LN_2 / self.theta
  }

  /// Stationary log-price distribution `N(mu, sigma^2 / (2 theta))`, or
  /// `None` for a degenerate (zero-volatility) process.
  pub fn stationary_distribution(&self) -> Option<Normal> {
    if self.sigma == 0.0 {
      return None;
    }
    Normal::new(self.mu, self.sigma / (2.0 * self.theta).sqrt()).ok()
  }
}

/// Estimates [`ProcessParameters`] from a price history sampled every `dt`
/// seconds.
pub struct OUParameterEstimation {
  /// Observed prices on an equidistant grid.
  pub prices: Array1<f64>,
  /// Sampling interval in seconds.
  pub dt: f64,
  // Estimated parameters
  theta: Option<f64>,
  mu: Option<f64>,
  sigma: Option<f64>,
}

impl OUParameterEstimation {
  pub fn new(prices: Array1<f64>, dt: f64) -> Self {
    Self {
      prices,
      dt,
      theta: None,
      mu: None,
      sigma: None,
    }
  }

  /// Runs the full estimation. Pure: depends only on `prices` and `dt`.
  pub fn estimate_parameters(&mut self) -> Result<ProcessParameters> {
    self.validate()?;

    let log_prices = self.prices.mapv(f64::ln);
    let returns =
      Array1::from_iter((1..log_prices.len()).map(|i| log_prices[i] - log_prices[i - 1]));

    self.theta_estimator(&returns);
    self.mu_estimator(&log_prices);
    self.sigma_estimator(&returns);

    let params = ProcessParameters {
      theta: self.theta.unwrap_or(THETA_MIN),
      mu: self.mu.unwrap_or_default(),
      sigma: self.sigma.unwrap_or_default(),
    };

    if !params.theta.is_finite() || !params.mu.is_finite() || !params.sigma.is_finite() {
      return Err(ForecastError::NumericInstability(format!(
        "non-finite parameter estimate: theta={}, mu={}, sigma={}",
        params.theta, params.mu, params.sigma
      )));
    }

    debug!(
      theta = params.theta,
      mu = params.mu,
      sigma = params.sigma,
      "estimated OU parameters"
    );

    Ok(params)
  }

  fn validate(&self) -> Result<()> {
    if self.prices.len() < 3 {
      return Err(ForecastError::InvalidInput(format!(
        "at least 3 prices are required, got {}",
        self.prices.len()
      )));
    }
    if let Some(p) = self.prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
      return Err(ForecastError::InvalidInput(format!(
        "prices must be finite and positive, got {p}"
      )));
    }
    if !self.dt.is_finite() || self.dt <= 0.0 {
      return Err(ForecastError::InvalidInput(format!(
        "dt must be finite and positive, got {}",
        self.dt
      )));
    }
    Ok(())
  }

  /// `theta = clamp(-ln(|rho|) / dt, 0.1, 10.0)`.
  ///
  /// `rho == 0` (including the zero-variance case) sends the raw formula to
  /// +inf, so it lands on the upper clamp boundary directly.
  fn theta_estimator(&mut self, returns: &Array1<f64>) {
    let rho = stats::lag1_autocorrelation(returns);
    let theta = if rho == 0.0 {
      THETA_MAX
    } else {
      (-rho.abs().ln() / self.dt).clamp(THETA_MIN, THETA_MAX)
    };
    self.theta = Some(theta);
  }

  /// Exponentially weighted mean of the log-prices, weight `exp(-theta*age)`
  /// with `age` counted in steps back from the latest sample. Tracks the
  /// recent level more responsively than a plain mean.
  fn mu_estimator(&mut self, log_prices: &Array1<f64>) {
    let theta = self.theta.unwrap_or(THETA_MIN);
    let n = log_prices.len();

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for (i, x) in log_prices.iter().enumerate() {
      let age = (n - 1 - i) as f64;
      let w = (-theta * age).exp();
      weighted_sum += w * x;
      weight_sum += w;
    }

    self.mu = Some(weighted_sum / weight_sum);
  }

  /// Bias-corrected volatility, capped at [`SIGMA_MAX`]. The correction
  /// denominator is floored so a tiny `theta * dt` cannot divide by zero.
  fn sigma_estimator(&mut self, returns: &Array1<f64>) {
    let theta = self.theta.unwrap_or(THETA_MIN);
    let sigma_emp = stats::population_std(returns);

    let denom = (1.0 - (-2.0 * theta * self.dt).exp()).max(CORRECTION_DENOM_FLOOR);
    let sigma = sigma_emp * (2.0 * theta / denom).sqrt();
    self.sigma = Some(sigma.min(SIGMA_MAX));
  }
}
