pub mod cache;
pub mod config;
pub mod distribution;
pub mod preview;
pub mod validation;

pub use cache::DistributionCache;
pub use config::*;
pub use distribution::{calculate_point_distribution, DistributionRequest, PointDistribution};
pub use preview::{preview_distribution, PlacementPreview};
pub use validation::validate_ranking;
