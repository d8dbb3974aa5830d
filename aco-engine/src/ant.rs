use aco_instances::Instance;
use rand::{rngs::SmallRng, Rng};
use serde::{Deserialize, Serialize};

use crate::{params::Parameters, pheromones::PheromoneMatrix};

/// One completed closed tour: the visiting order and its total length,
/// closing edge back to the start included.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TourResult {
    pub route: Vec<usize>,
    pub distance: f64,
}

/// A single tour-construction agent. Owns all of its state except the
/// pheromone matrix, which it shares with every other agent in the run.
pub struct Ant<'a> {
    instance: &'a Instance,
    pheromones: &'a PheromoneMatrix,
    alpha: f64,
    beta: f64,
    q: f64,
    rng: SmallRng,
    start: usize,
    visited: Vec<bool>,
    route: Vec<usize>,
    distance: f64,
    remaining: usize,
}

fn invert_distance(distance: f64) -> f64 {
    if distance == 0.0 {
        0.0
    } else {
        1.0 / distance
    }
}

impl<'a> Ant<'a> {
    pub fn new(
        instance: &'a Instance,
        pheromones: &'a PheromoneMatrix,
        params: &Parameters,
        start: usize,
        rng: SmallRng,
    ) -> Self {
        let num_nodes = instance.num_nodes();
        let mut visited = vec![false; num_nodes];
        visited[start] = true;
        Self {
            instance,
            pheromones,
            alpha: params.alpha,
            beta: params.beta,
            q: params.q,
            rng,
            start,
            visited,
            route: Vec::with_capacity(num_nodes),
            distance: 0.0,
            remaining: num_nodes - 1,
        }
    }

    /// Biased random walk until every node is visited. Each step deposits
    /// `q / distance_so_far` on the edge just taken, so edges later in the
    /// tour receive smaller deposits. The closing edge gets no deposit.
    pub fn construct_tour(mut self) -> TourResult {
        let mut last = self.start;
        while let Some(next) = self.select_next(last) {
            self.route.push(last);
            self.distance += self.instance.distance(last, next);
            self.pheromones.update(last, next, self.q / self.distance);
            self.visited[next] = true;
            self.remaining -= 1;
            last = next;
        }
        self.route.push(last);
        self.distance += self.instance.distance(last, self.start);
        TourResult {
            route: self.route,
            distance: self.distance,
        }
    }

    /// Roulette-wheel selection over the unvisited nodes, weighted by
    /// `pheromone^alpha * (1/distance)^beta` normalised per column.
    fn select_next(&mut self, last: usize) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let num_nodes = self.visited.len();

        let mut column_sum = 0.0;
        for i in 0..num_nodes {
            column_sum += self.edge_score(last, i);
        }

        let mut weights = vec![0.0; num_nodes];
        let mut sum = 0.0;
        let mut fallback = last;
        for i in 0..num_nodes {
            if !self.visited[i] {
                weights[i] = self.edge_score(last, i) / column_sum;
                sum += weights[i];
                fallback = i;
            }
        }

        // Degenerate column: no unvisited node carries any weight. Take the
        // last unvisited one rather than stalling.
        if sum == 0.0 {
            return Some(fallback);
        }

        let r: f64 = self.rng.gen();
        let mut cumulative = 0.0;
        for i in 0..num_nodes {
            if !self.visited[i] {
                cumulative += weights[i] / sum;
                if r <= cumulative {
                    return Some(i);
                }
            }
        }

        // Rounding left the draw above the top of the cumulative
        // distribution; the highest-index unvisited node closes the gap.
        Some(fallback)
    }

    fn edge_score(&self, from: usize, to: usize) -> f64 {
        self.pheromones.read(from, to).powf(self.alpha)
            * invert_distance(self.instance.distance(from, to)).powf(self.beta)
    }
}
