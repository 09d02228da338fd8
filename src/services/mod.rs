pub mod damped_mean;
pub mod neighbor_weighted;
pub mod neighbors;
pub mod recommendations;
pub mod similarity;
pub mod sources;
pub mod strategy;

pub use damped_mean::DampedMeanScorer;
pub use neighbor_weighted::NeighborWeightedPredictor;
pub use strategy::{Strategy, StrategyKind};
