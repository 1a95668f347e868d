//! # Price Series
//!
//! $$
//! r_i=\ln P_{i+1}-\ln P_i
//! $$
//!
//! Validated `(timestamp, price)` history shared by the estimator and the
//! simulator. The simulator returns its forward path in the same shape so the
//! caller can concatenate history and forecast directly.

use ndarray::Array1;

use crate::error::ForecastError;
use crate::error::Result;
use crate::stats;

/// Trailing window used for the short-term trend estimate.
pub const TREND_WINDOW: usize = 20;

/// Ordered `(timestamp, price)` samples with strictly increasing timestamps
/// and strictly positive prices. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
  timestamps: Vec<i64>,
  prices: Array1<f64>,
}

impl PriceSeries {
  pub fn new(timestamps: Vec<i64>, prices: Vec<f64>) -> Result<Self> {
    if timestamps.is_empty() {
      return Err(ForecastError::InvalidInput("series is empty".into()));
    }
    if timestamps.len() != prices.len() {
      return Err(ForecastError::InvalidInput(format!(
        "{} timestamps but {} prices",
        timestamps.len(),
        prices.len()
      )));
    }
    if timestamps.windows(2).any(|w| w[1] <= w[0]) {
      return Err(ForecastError::InvalidInput(
        "timestamps must be strictly increasing".into(),
      ));
    }
    if let Some(p) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
      return Err(ForecastError::InvalidInput(format!(
        "prices must be finite and positive, got {p}"
      )));
    }

    Ok(Self {
      timestamps,
      prices: Array1::from(prices),
    })
  }

  pub fn len(&self) -> usize {
    self.timestamps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.timestamps.is_empty()
  }

  pub fn timestamps(&self) -> &[i64] {
    &self.timestamps
  }

  pub fn prices(&self) -> &Array1<f64> {
    &self.prices
  }

  pub fn last_price(&self) -> f64 {
    self.prices[self.prices.len() - 1]
  }

  pub fn last_timestamp(&self) -> i64 {
    self.timestamps[self.timestamps.len() - 1]
  }

  /// Sampling interval in seconds, taken from the first two samples.
  pub fn dt(&self) -> Result<f64> {
    if self.len() < 2 {
      return Err(ForecastError::InvalidInput(
        "at least 2 samples are required to infer a sampling interval".into(),
      ));
    }
    Ok((self.timestamps[1] - self.timestamps[0]) as f64)
  }

  pub fn log_prices(&self) -> Array1<f64> {
    self.prices.mapv(f64::ln)
  }

  /// Consecutive log returns; length `len - 1`.
  pub fn log_returns(&self) -> Array1<f64> {
    let logs = self.log_prices();
    Array1::from_iter((1..logs.len()).map(|i| logs[i] - logs[i - 1]))
  }

  /// Mean log return over the trailing `min(TREND_WINDOW, len)` samples,
  /// fed to the simulator as an additive per-step drift.
  pub fn trend_estimate(&self) -> f64 {
    let window = TREND_WINDOW.min(self.len());
    if window < 2 {
      return 0.0;
    }
    let logs = self.log_prices();
    let start = logs.len() - window;
    let tail_returns = Array1::from_iter((start + 1..logs.len()).map(|i| logs[i] - logs[i - 1]));
    stats::mean(&tail_returns)
  }

  /// History followed by a forecast continuation as one series. Fails if the
  /// other series does not start strictly after this one ends.
  pub fn concat(&self, other: &PriceSeries) -> Result<PriceSeries> {
    if other.timestamps[0] <= self.last_timestamp() {
      return Err(ForecastError::InvalidInput(format!(
        "cannot concatenate: series starting at {} does not follow one ending at {}",
        other.timestamps[0],
        self.last_timestamp()
      )));
    }

    let mut timestamps = self.timestamps.clone();
    timestamps.extend_from_slice(&other.timestamps);
    let mut prices = self.prices.to_vec();
    prices.extend(other.prices.iter().copied());

    PriceSeries::new(timestamps, prices)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  fn daily(prices: Vec<f64>) -> PriceSeries {
    let timestamps = (0..prices.len() as i64).map(|i| i * 86_400).collect();
    PriceSeries::new(timestamps, prices).unwrap()
  }

  #[test]
  fn rejects_empty_series() {
    assert!(matches!(
      PriceSeries::new(vec![], vec![]),
      Err(ForecastError::InvalidInput(_))
    ));
  }

  #[test]
  fn rejects_unsorted_timestamps() {
    assert!(matches!(
      PriceSeries::new(vec![0, 100, 100], vec![1.0, 2.0, 3.0]),
      Err(ForecastError::InvalidInput(_))
    ));
  }

  #[test]
  fn rejects_non_positive_price() {
    assert!(matches!(
      PriceSeries::new(vec![0, 1, 2], vec![1.0, 0.0, 3.0]),
      Err(ForecastError::InvalidInput(_))
    ));
    assert!(matches!(
      PriceSeries::new(vec![0, 1, 2], vec![1.0, -2.0, 3.0]),
      Err(ForecastError::InvalidInput(_))
    ));
  }

  #[test]
  fn rejects_length_mismatch() {
    assert!(matches!(
      PriceSeries::new(vec![0, 1], vec![1.0]),
      Err(ForecastError::InvalidInput(_))
    ));
  }

  #[test]
  fn log_returns_have_expected_length_and_values() {
    let series = daily(vec![100.0, 110.0, 121.0]);
    let returns = series.log_returns();

    assert_eq!(returns.len(), 2);
    assert_relative_eq!(returns[0], 1.1_f64.ln(), epsilon = 1e-12);
    assert_relative_eq!(returns[1], 1.1_f64.ln(), epsilon = 1e-12);
  }

  #[test]
  fn dt_is_inferred_from_spacing() {
    let series = daily(vec![100.0, 101.0, 102.0]);
    assert_relative_eq!(series.dt().unwrap(), 86_400.0);
  }

  #[test]
  fn trend_of_constant_ratio_series_is_log_ratio() {
    let prices = (0..40).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
    let series = daily(prices);

    assert_relative_eq!(series.trend_estimate(), 1.01_f64.ln(), epsilon = 1e-12);
  }

  #[test]
  fn trend_window_ignores_older_history() {
    // 30 flat samples, then 25 samples growing 1% per step: the trailing
    // 20-sample window only sees the growth regime.
    let mut prices: Vec<f64> = vec![100.0; 30];
    prices.extend((1..=25).map(|i| 100.0 * 1.01_f64.powi(i)));
    let series = daily(prices);

    assert_relative_eq!(series.trend_estimate(), 1.01_f64.ln(), epsilon = 1e-12);
  }

  #[test]
  fn concat_appends_forecast_after_history() {
    let history = daily(vec![100.0, 101.0, 102.0]);
    let forecast = PriceSeries::new(vec![3 * 86_400, 4 * 86_400], vec![103.0, 104.0]).unwrap();

    let combined = history.concat(&forecast).unwrap();
    assert_eq!(combined.len(), 5);
    assert_eq!(combined.last_timestamp(), 4 * 86_400);
    assert_relative_eq!(combined.last_price(), 104.0);
  }

  #[test]
  fn concat_rejects_overlapping_series() {
    let history = daily(vec![100.0, 101.0, 102.0]);
    let overlapping = PriceSeries::new(vec![2 * 86_400, 3 * 86_400], vec![103.0, 104.0]).unwrap();

    assert!(matches!(
      history.concat(&overlapping),
      Err(ForecastError::InvalidInput(_))
    ));
  }
}
