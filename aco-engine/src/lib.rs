pub mod ant;
pub mod colony;
pub mod params;
pub mod pheromones;

pub use ant::TourResult;
pub use colony::{Colony, RunSummary};
pub use params::Parameters;
pub use pheromones::PheromoneMatrix;
