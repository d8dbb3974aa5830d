use std::sync::atomic::{AtomicU64, Ordering};

/// Shared desirability scores per directed edge. Cells are f64 bit patterns
/// in atomics, so agents get per-cell atomic reads and read-modify-writes
/// without a matrix-wide lock. No symmetry is maintained: (i, j) and (j, i)
/// evolve independently.
pub struct PheromoneMatrix {
    num_nodes: usize,
    persistence: f64,
    cells: Vec<AtomicU64>,
}

impl PheromoneMatrix {
    /// Every cell starts at the same `initial` value.
    pub fn new(num_nodes: usize, persistence: f64, initial: f64) -> Self {
        let bits = initial.to_bits();
        Self {
            num_nodes,
            persistence,
            cells: (0..num_nodes * num_nodes)
                .map(|_| AtomicU64::new(bits))
                .collect(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Atomic snapshot of one cell; never observes a torn write.
    pub fn read(&self, from: usize, to: usize) -> f64 {
        f64::from_bits(self.cells[from * self.num_nodes + to].load(Ordering::Acquire))
    }

    /// Atomically decays the cell and folds in `deposit`, clamped at zero:
    /// `new = (1 - persistence) * current + deposit`. The read-compute-write
    /// is one indivisible step via a compare-exchange loop.
    pub fn update(&self, from: usize, to: usize, deposit: f64) {
        let cell = &self.cells[from * self.num_nodes + to];
        let mut observed = cell.load(Ordering::Acquire);
        loop {
            let current = f64::from_bits(observed);
            let decayed = (1.0 - self.persistence) * current + deposit;
            let next = if decayed >= 0.0 { decayed } else { 0.0 };
            match cell.compare_exchange_weak(
                observed,
                next.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => observed = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_broadcasts_initial_value() {
        let matrix = PheromoneMatrix::new(4, 0.3, 0.42);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(matrix.read(i, j), 0.42);
            }
        }
    }

    #[test]
    fn test_update_applies_decay_and_deposit() {
        let matrix = PheromoneMatrix::new(3, 0.3, 1.0);
        matrix.update(0, 1, 0.5);
        assert_eq!(matrix.read(0, 1), (1.0 - 0.3) * 1.0 + 0.5);
        // directed: the reverse edge is untouched
        assert_eq!(matrix.read(1, 0), 1.0);
    }

    #[test]
    fn test_update_clamps_at_zero() {
        let matrix = PheromoneMatrix::new(2, 0.3, 0.5);
        matrix.update(0, 1, -10.0);
        assert_eq!(matrix.read(0, 1), 0.0);
    }

    #[test]
    fn test_zero_deposit_contracts_monotonically() {
        let matrix = PheromoneMatrix::new(2, 0.3, 1.0);
        let mut previous = matrix.read(0, 1);
        for _ in 0..1000 {
            matrix.update(0, 1, 0.0);
            let current = matrix.read(0, 1);
            assert!(current >= 0.0);
            assert!(current <= previous);
            previous = current;
        }
        assert!(matrix.read(0, 1) < 1e-9);
    }

    #[test]
    fn test_full_decay_zero_deposit_is_idempotent() {
        // persistence = 1 pins the cell at zero after a single touch
        let matrix = PheromoneMatrix::new(2, 1.0, 0.37);
        matrix.update(0, 1, 0.0);
        assert_eq!(matrix.read(0, 1), 0.0);
        matrix.update(0, 1, 0.0);
        assert_eq!(matrix.read(0, 1), 0.0);
    }

    #[test]
    fn test_concurrent_updates_never_go_negative() {
        let matrix = Arc::new(PheromoneMatrix::new(8, 0.3, 0.5));
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let matrix = Arc::clone(&matrix);
                std::thread::spawn(move || {
                    for k in 0..10_000u64 {
                        let from = ((t + k) % 8) as usize;
                        let to = (k % 8) as usize;
                        let deposit = if k % 3 == 0 { -0.25 } else { 0.01 };
                        matrix.update(from, to, deposit);
                        let value = matrix.read(from, to);
                        assert!(value >= 0.0);
                        assert!(value.is_finite());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        for i in 0..8 {
            for j in 0..8 {
                assert!(matrix.read(i, j) >= 0.0);
            }
        }
    }
}
