use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;

use anyhow::Context;
use anyhow::Result;
use chrono::DateTime;
use prettytable::row;
use prettytable::Table;

use ou_forecast::estimator::OUParameterEstimation;
use ou_forecast::forecast::OUPathSimulator;
use ou_forecast::series::PriceSeries;
use ou_forecast::traits::ProcessExt;
use ou_forecast::DEFAULT_HORIZON_DAYS;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let args: Vec<String> = std::env::args().collect();
  if args.len() < 3 {
    eprintln!("Usage: ou-forecast <data_file> <ticker> [horizon_days]");
    std::process::exit(1);
  }
  let path = &args[1];
  let ticker = &args[2];
  let horizon_days: u32 = match args.get(3) {
    Some(raw) => raw.parse().context("horizon_days must be an integer")?,
    None => DEFAULT_HORIZON_DAYS,
  };

  let series = read_series_from_file(path)?;
  let dt = series.dt()?;

  let mut estimation = OUParameterEstimation::new(series.prices().clone(), dt);
  let params = estimation.estimate_parameters()?;
  let trend = series.trend_estimate();

  let simulator = OUPathSimulator::new(
    params,
    trend,
    series.last_price(),
    series.last_timestamp(),
    dt,
    Some(horizon_days),
  );
  let forecast = simulator.sample()?;
  let combined = series.concat(&forecast)?;

  let output_path = format!("{}_with_predictions.txt", path.trim_end_matches(".txt"));
  write_series_to_file(&combined, &output_path)?;

  let mut summary = Table::new();
  summary.add_row(row!["Ticker", ticker]);
  summary.add_row(row!["Original data points", series.len()]);
  summary.add_row(row!["Predicted data points", forecast.len()]);
  summary.add_row(row![
    "Last actual price",
    format!("${:.2}", series.last_price())
  ]);
  summary.add_row(row![
    "Final predicted price",
    format!("${:.2} ({})", forecast.last_price(), format_date(forecast.last_timestamp()))
  ]);
  summary.add_row(row!["Horizon", format!("{horizon_days} days")]);
  summary.add_row(row!["Reversion speed (theta)", format!("{:.6}", params.theta)]);
  summary.add_row(row![
    "Long-run level",
    format!("${:.2}", params.equilibrium_price())
  ]);
  summary.add_row(row!["Volatility (sigma)", format!("{:.6}", params.sigma)]);
  summary.add_row(row![
    "Detected trend",
    format!("{:.2}% per period", trend * 100.0)
  ]);
  summary.add_row(row!["Output", &output_path]);
  summary.printstd();

  Ok(())
}

fn format_date(ts: i64) -> String {
  DateTime::from_timestamp(ts, 0)
    .map(|d| d.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|| ts.to_string())
}

/// Reads `timestamp,price` lines, skipping a header row if present.
fn read_series_from_file(path: &str) -> Result<PriceSeries> {
  let file = File::open(path).with_context(|| format!("opening {path}"))?;
  let reader = BufReader::new(file);

  let mut timestamps = Vec::new();
  let mut prices = Vec::new();
  for line in reader.lines() {
    let line = line?;
    let line = line.trim();
    if line.is_empty() || line.starts_with("timestamp") {
      continue;
    }
    let (ts, price) = line
      .split_once(',')
      .with_context(|| format!("malformed line: {line}"))?;
    timestamps.push(ts.trim().parse()?);
    prices.push(price.trim().parse()?);
  }

  Ok(PriceSeries::new(timestamps, prices)?)
}

fn write_series_to_file(series: &PriceSeries, path: &str) -> Result<()> {
  let mut file = File::create(path).with_context(|| format!("creating {path}"))?;
  writeln!(file, "timestamp,price")?;
  for (ts, price) in series.timestamps().iter().zip(series.prices().iter()) {
    writeln!(file, "{ts},{price:.2}")?;
  }
  Ok(())
}
