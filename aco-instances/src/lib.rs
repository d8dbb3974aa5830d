use std::collections::HashSet;

use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub mod tsplib;

/// A symmetric Euclidean TSP instance: node coordinates plus the
/// precomputed pairwise distance matrix.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Instance {
    pub node_positions: Vec<(f64, f64)>,
    pub distance_matrix: Vec<Vec<f64>>,
}

impl Instance {
    /// Builds the full distance matrix from coordinates. This is the only
    /// place distances are computed; the matrix is read-only afterwards.
    pub fn from_node_positions(node_positions: Vec<(f64, f64)>) -> Self {
        let distance_matrix: Vec<Vec<f64>> = node_positions
            .iter()
            .map(|&from| {
                node_positions
                    .iter()
                    .map(|&to| {
                        let dx = from.0 - to.0;
                        let dy = from.1 - to.1;
                        dx.hypot(dy)
                    })
                    .collect()
            })
            .collect();
        Self {
            node_positions,
            distance_matrix,
        }
    }

    /// Deterministic random instance on a 1000x1000 grid with distinct
    /// integer positions.
    pub fn generate(seed: u64, num_nodes: usize) -> Result<Self> {
        if num_nodes < 3 {
            return Err(anyhow!("Number of nodes must be at least 3"));
        }
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut node_positions: Vec<(f64, f64)> = Vec::with_capacity(num_nodes);
        let mut seen: HashSet<(i64, i64)> = HashSet::with_capacity(num_nodes);
        while node_positions.len() < num_nodes {
            let pos = (rng.gen_range(0..=1000i64), rng.gen_range(0..=1000i64));
            if !seen.insert(pos) {
                continue;
            }
            node_positions.push((pos.0 as f64, pos.1 as f64));
        }

        Ok(Self::from_node_positions(node_positions))
    }

    /// Checks the invariants every distance matrix must satisfy before a
    /// run: square and matching the coordinate count, finite non-negative
    /// entries, zero diagonal, symmetric. Instances built by this crate
    /// hold these by construction; deserialized ones must be checked here
    /// before they reach the solver.
    pub fn validate(&self) -> Result<()> {
        let num_nodes = self.node_positions.len();
        if self.distance_matrix.len() != num_nodes {
            return Err(anyhow!(
                "Distance matrix has {} rows for {} nodes",
                self.distance_matrix.len(),
                num_nodes
            ));
        }
        for (i, row) in self.distance_matrix.iter().enumerate() {
            if row.len() != num_nodes {
                return Err(anyhow!(
                    "Distance matrix row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    num_nodes
                ));
            }
        }
        for i in 0..num_nodes {
            if self.distance_matrix[i][i] != 0.0 {
                return Err(anyhow!("Distance matrix diagonal entry ({}, {}) is non-zero", i, i));
            }
            for j in 0..num_nodes {
                let distance = self.distance_matrix[i][j];
                if !distance.is_finite() || distance < 0.0 {
                    return Err(anyhow!(
                        "Distance matrix entry ({}, {}) is invalid: {}",
                        i,
                        j,
                        distance
                    ));
                }
                if distance != self.distance_matrix[j][i] {
                    return Err(anyhow!(
                        "Distance matrix is not symmetric at ({}, {})",
                        i,
                        j
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn num_nodes(&self) -> usize {
        self.distance_matrix.len()
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance_matrix[from][to]
    }

    /// Validates that `route` is a closed tour over this instance and
    /// returns its total length, closing edge included.
    pub fn tour_distance(&self, route: &[usize]) -> Result<f64> {
        let num_nodes = self.num_nodes();
        if route.len() != num_nodes {
            return Err(anyhow!(
                "Route length ({}) does not match number of nodes ({})",
                route.len(),
                num_nodes
            ));
        }
        if route.iter().any(|&node| node >= num_nodes) {
            return Err(anyhow!("Route contains invalid nodes"));
        }
        let visited = route.iter().cloned().collect::<HashSet<usize>>();
        if visited.len() != route.len() {
            return Err(anyhow!("Route contains duplicate nodes"));
        }
        let total_distance = route
            .windows(2)
            .map(|w| self.distance_matrix[w[0]][w[1]])
            .sum::<f64>()
            + self.distance_matrix[route[route.len() - 1]][route[0]];
        Ok(total_distance)
    }
}
