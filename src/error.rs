use thiserror::Error;

/// Errors raised by the estimation and simulation stages.
///
/// Both stages are pure: they raise immediately on violated preconditions and
/// never retry or emit partial results. Numeric edge cases are primarily
/// handled by documented floors and clamps; `NumericInstability` only fires
/// when a parameter still ends up non-finite after those corrections.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
  #[error("invalid input: {0}")]
  InvalidInput(String),
  #[error("numeric instability: {0}")]
  NumericInstability(String),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
