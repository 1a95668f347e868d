use rand::Rng;
use rayon::prelude::*;

/// Sampling seam shared by the forecasting processes.
///
/// The generator is injected through [`ProcessExt::sample_rng`] so a seeded
/// [`rand::rngs::StdRng`] reproduces a path byte for byte; [`ProcessExt::sample`]
/// is the thread-RNG convenience wrapper.
pub trait ProcessExt: Send + Sync {
  type Output: Send;

  fn sample_rng<R: Rng>(&self, rng: &mut R) -> Self::Output;

  fn sample(&self) -> Self::Output {
    self.sample_rng(&mut rand::thread_rng())
  }

  /// Draw `m` independent realizations in parallel, one thread RNG each.
  fn sample_par(&self, m: usize) -> Vec<Self::Output> {
    (0..m).into_par_iter().map(|_| self.sample()).collect()
  }
}
