//! # Bounded OU Path Simulation
//!
//! $$
//! dx=\theta(\mu-x_t)\Delta t+\sigma\,dW+\tau\Delta t,\qquad dx\in[-0.1,0.1]
//! $$
//!
//! Forward simulation of the estimated process with two hard stability
//! controls a naive OU simulation lacks: a per-step clamp on the log-price
//! move and a whole-path price band around the last observed price. The price
//! band is re-applied in log space each step, so it shapes the rest of the
//! path instead of only the printed output.

use impl_new_derive::ImplNew;
use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Normal;
use tracing::debug;

use crate::error::ForecastError;
use crate::error::Result;
use crate::estimator::ProcessParameters;
use crate::series::PriceSeries;
use crate::traits::ProcessExt;
use crate::DAY_SECS;
use crate::DEFAULT_HORIZON_DAYS;
use crate::MAX_STEPS;

/// Largest single-step log-price move (roughly +-10% per step).
pub const MAX_STEP_LOG_MOVE: f64 = 0.1;
/// Whole-path price band, as ratios of the last observed price.
pub const PATH_FLOOR_RATIO: f64 = 0.5;
pub const PATH_CEIL_RATIO: f64 = 2.0;

/// Simulates a forward `(timestamp, price)` continuation of a price history.
///
/// Stateless across invocations: every call starts from `last_price` /
/// `last_timestamp` and an injected randomness source.
#[derive(ImplNew)]
pub struct OUPathSimulator {
  /// Estimated process parameters.
  pub params: ProcessParameters,
  /// Additive per-step log drift (short-term trend estimate).
  pub trend: f64,
  /// Last observed price; anchors the path band.
  pub last_price: f64,
  /// Last observed timestamp in seconds since epoch.
  pub last_timestamp: i64,
  /// Sampling interval in seconds.
  pub dt: f64,
  /// Forecast horizon in days; defaults to 30.
  pub horizon_days: Option<u32>,
}

impl OUPathSimulator {
  /// Number of simulation steps, `floor(horizon_days * 86400 / dt)`.
  pub fn n_steps(&self) -> Result<usize> {
    self.validate()?;

    let horizon_days = self.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS);
    let n_steps = (horizon_days as f64 * DAY_SECS / self.dt).floor();
    if n_steps < 1.0 {
      return Err(ForecastError::InvalidInput(format!(
        "horizon of {horizon_days} days at dt={} yields no simulation steps",
        self.dt
      )));
    }
    if n_steps > MAX_STEPS as f64 {
      return Err(ForecastError::InvalidInput(format!(
        "horizon of {horizon_days} days at dt={} yields {n_steps} steps, cap is {MAX_STEPS}",
        self.dt
      )));
    }

    Ok(n_steps as usize)
  }

  fn validate(&self) -> Result<()> {
    if !self.last_price.is_finite() || self.last_price <= 0.0 {
      return Err(ForecastError::InvalidInput(format!(
        "last price must be finite and positive, got {}",
        self.last_price
      )));
    }
    // The emitted timestamp stride is floor(dt); anything below one second
    // would stall the timestamps.
    if !self.dt.is_finite() || self.dt < 1.0 {
      return Err(ForecastError::InvalidInput(format!(
        "dt must be at least 1 second, got {}",
        self.dt
      )));
    }
    if self.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS) == 0 {
      return Err(ForecastError::InvalidInput(
        "horizon must be at least 1 day".into(),
      ));
    }
    if !self.trend.is_finite() {
      return Err(ForecastError::InvalidInput(format!(
        "trend must be finite, got {}",
        self.trend
      )));
    }
    Ok(())
  }

  fn simulate<R: Rng>(&self, rng: &mut R) -> Result<PriceSeries> {
    let n_steps = self.n_steps()?;
    let step_secs = self.dt.floor() as i64;

    let noise_dist = Normal::new(0.0, self.dt.sqrt())
      .map_err(|e| ForecastError::NumericInstability(format!("noise distribution: {e}")))?;
    let noise = Array1::random_using(n_steps, noise_dist, rng);

    let floor_price = self.last_price * PATH_FLOOR_RATIO;
    let ceil_price = self.last_price * PATH_CEIL_RATIO;

    let mut log_price = self.last_price.ln();
    let mut timestamp = self.last_timestamp;
    let mut timestamps = Vec::with_capacity(n_steps);
    let mut prices = Vec::with_capacity(n_steps);

    for i in 0..n_steps {
      let pull = self.params.theta * (self.params.mu - log_price) * self.dt;
      let dx = (pull + self.params.sigma * noise[i] + self.trend * self.dt)
        .clamp(-MAX_STEP_LOG_MOVE, MAX_STEP_LOG_MOVE);
      log_price += dx;

      let price = log_price.exp().clamp(floor_price, ceil_price);
      // Load-bearing: the band feeds back into the next step.
      log_price = price.ln();

      timestamp += step_secs;
      timestamps.push(timestamp);
      prices.push(price);
    }

    debug!(
      n_steps,
      first = prices[0],
      last = prices[n_steps - 1],
      "simulated forward path"
    );

    PriceSeries::new(timestamps, prices)
  }
}

impl ProcessExt for OUPathSimulator {
  type Output = Result<PriceSeries>;

  fn sample_rng<R: Rng>(&self, rng: &mut R) -> Self::Output {
    self.simulate(rng)
  }
}
