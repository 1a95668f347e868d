//! # Mean-Reverting Price Forecasting
//!
//! `ou_forecast` fits a mean-reverting (Ornstein-Uhlenbeck style) process to
//! historical log-prices and simulates bounded forward price paths.
//!
//! ## Modules
//!
//! | Module        | Description                                                                |
//! |---------------|----------------------------------------------------------------------------|
//! | [`series`]    | Validated price series, log-returns and short-term trend estimation.       |
//! | [`stats`]     | Descriptive reductions (mean, population std, lag-1 autocorrelation).      |
//! | [`estimator`] | OU parameter estimation with stability clamps.                             |
//! | [`forecast`]  | Bounded forward path simulation driven by the estimated parameters.        |
//! | [`traits`]    | Sampling abstraction with injectable RNG and parallel multi-path support.  |
//! | [`error`]     | Error taxonomy shared by the estimation and simulation stages.             |
//!
//! ## Example Usage
//!
//! ```rust
//! use ou_forecast::estimator::OUParameterEstimation;
//! use ou_forecast::forecast::OUPathSimulator;
//! use ou_forecast::series::PriceSeries;
//! use ou_forecast::traits::ProcessExt;
//!
//! let series = PriceSeries::new(
//!   (0..60i64).map(|i| i * 86_400).collect(),
//!   (0..60).map(|i| 100.0 + (i as f64 * 0.5).sin()).collect(),
//! )?;
//!
//! let mut estimation = OUParameterEstimation::new(series.prices().clone(), series.dt()?);
//! let params = estimation.estimate_parameters()?;
//!
//! let simulator = OUPathSimulator::new(
//!   params,
//!   series.trend_estimate(),
//!   series.last_price(),
//!   series.last_timestamp(),
//!   86_400.0,
//!   None,
//! );
//! let path = simulator.sample()?;
//! # Ok::<(), ou_forecast::error::ForecastError>(())
//! ```

pub mod error;
pub mod estimator;
pub mod forecast;
pub mod series;
pub mod stats;
pub mod traits;

pub use crate::error::ForecastError;
pub use crate::estimator::OUParameterEstimation;
pub use crate::estimator::ProcessParameters;
pub use crate::forecast::OUPathSimulator;
pub use crate::series::PriceSeries;
pub use crate::traits::ProcessExt;

/// Seconds per trading day used to convert a horizon in days into steps.
pub const DAY_SECS: f64 = 86_400.0;
/// Default forecast horizon in days.
pub const DEFAULT_HORIZON_DAYS: u32 = 30;
/// Upper bound on the simulation step count; `horizon_days` and `dt` are
/// caller-controlled, so the derived loop bound must be capped.
pub const MAX_STEPS: usize = 5_000_000;
