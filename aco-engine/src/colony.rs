use std::sync::Arc;

use aco_instances::Instance;
use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use tokio::runtime::Runtime;

use crate::{
    ant::{Ant, TourResult},
    params::Parameters,
    pheromones::PheromoneMatrix,
};

/// Outcome of a full colony run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub best: TourResult,
    pub completed: u64,
    pub failed: u64,
}

/// Orchestrates one run: builds the shared pheromone matrix, launches the
/// full ant population against it and aggregates their results.
pub struct Colony {
    params: Parameters,
}

/// splitmix64-style mix of the base seed and agent index, so every agent
/// gets an independent generator from one run-level seed.
fn agent_seed(base: u64, index: u64) -> u64 {
    let mut z = base.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl Colony {
    pub fn new(params: Parameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Runs the whole population and returns the best tour found.
    ///
    /// Agents are spawned as tasks on a multi-threaded runtime with at most
    /// `num_workers` in flight; the orchestrator consumes outcomes as they
    /// complete, in no particular order. `on_progress` is invoked with
    /// (results received, best so far) every `report_interval` results; the
    /// reported best distance is monotonically non-increasing. A panicked
    /// agent counts as a failure and never blocks termination: the loop ends
    /// after exactly `num_ants` outcomes, successes and failures combined.
    pub fn run(
        &self,
        instance: Arc<Instance>,
        mut on_progress: impl FnMut(u64, &TourResult),
    ) -> Result<RunSummary> {
        let num_nodes = instance.num_nodes();
        if num_nodes == 0 {
            return Err(anyhow!("Instance has no nodes"));
        }

        let base_seed = match self.params.seed {
            Some(seed) => seed,
            None => SmallRng::from_entropy().gen(),
        };
        // one broadcast value for every cell, drawn once per run
        let initial = SmallRng::seed_from_u64(base_seed).gen_range(0.0..1.0);
        let pheromones = Arc::new(PheromoneMatrix::new(
            num_nodes,
            self.params.persistence,
            initial,
        ));
        let params = Arc::new(self.params.clone());

        let runtime = Runtime::new()?;
        runtime.block_on(async {
            let mut best: Option<TourResult> = None;
            let mut completed = 0u64;
            let mut failed = 0u64;

            let mut outcomes = stream::iter(0..self.params.num_ants)
                .map(|index| {
                    let instance = Arc::clone(&instance);
                    let pheromones = Arc::clone(&pheromones);
                    let params = Arc::clone(&params);

                    tokio::spawn(async move {
                        let mut rng = SmallRng::seed_from_u64(agent_seed(base_seed, index));
                        let start = rng.gen_range(0..instance.num_nodes());
                        Ant::new(&instance, &pheromones, &params, start, rng).construct_tour()
                    })
                })
                .buffer_unordered(self.params.num_workers);

            while let Some(outcome) = outcomes.next().await {
                match outcome {
                    Ok(result) => {
                        completed += 1;
                        if best
                            .as_ref()
                            .map_or(true, |current| result.distance < current.distance)
                        {
                            best = Some(result);
                        }
                    }
                    // a panicked or cancelled agent still counts towards the
                    // expected total, so the loop cannot deadlock
                    Err(_) => failed += 1,
                }

                let received = completed + failed;
                if received % self.params.report_interval == 0 {
                    if let Some(best) = &best {
                        on_progress(received, best);
                    }
                }
            }

            let best = best.ok_or_else(|| {
                anyhow!("All {} agents failed to produce a tour", self.params.num_ants)
            })?;
            Ok(RunSummary {
                best,
                completed,
                failed,
            })
        })
    }
}
