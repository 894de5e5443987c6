pub mod constants;
pub mod coordinates;
pub mod progress;

pub use constants::*;
pub use coordinates::{haversine_distance, haversine_distance_with_clamp, HaversineClamp};
pub use progress::ProgressReporter;
