use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Tunable constants for one colony run. Defaults match the reference
/// parameterisation: a large population with a strongly distance-biased,
/// mildly pheromone-averse transition rule.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// Number of tour agents launched per run.
    pub num_ants: u64,
    /// Fraction in (0,1) controlling how much pheromone decays each time a
    /// cell is touched; the surviving share is `1 - persistence`.
    pub persistence: f64,
    /// Pheromone exponent in the transition rule. Negative values favour
    /// edges with less pheromone.
    pub alpha: f64,
    /// Inverse-distance exponent in the transition rule.
    pub beta: f64,
    /// Numerator of the per-step deposit `q / distance_so_far`.
    pub q: f64,
    /// Maximum number of agents in flight at once.
    pub num_workers: usize,
    /// Emit a best-so-far progress report every this many results.
    pub report_interval: u64,
    /// Base seed for the run; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            num_ants: 2048 * 20,
            persistence: 0.3,
            alpha: -0.2,
            beta: 9.6,
            q: 0.0001,
            num_workers: default_num_workers(),
            report_interval: 10_000,
            seed: None,
        }
    }
}

fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Parameters {
    pub fn validate(&self) -> Result<()> {
        if self.num_ants == 0 {
            return Err(anyhow!("num_ants must be non-zero"));
        }
        if self.num_workers == 0 {
            return Err(anyhow!("num_workers must be non-zero"));
        }
        if !(self.persistence > 0.0 && self.persistence < 1.0) {
            return Err(anyhow!(
                "persistence must be in (0, 1), got {}",
                self.persistence
            ));
        }
        if !self.alpha.is_finite() || !self.beta.is_finite() {
            return Err(anyhow!("alpha and beta must be finite"));
        }
        if !self.q.is_finite() || self.q < 0.0 {
            return Err(anyhow!("q must be finite and non-negative, got {}", self.q));
        }
        if self.report_interval == 0 {
            return Err(anyhow!("report_interval must be non-zero"));
        }
        Ok(())
    }
}
