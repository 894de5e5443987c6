pub mod aggregator;
pub mod interval;
pub mod station_directory;

pub use aggregator::SegmentedAggregator;
pub use interval::extract_year_range;
pub use station_directory::StationDirectory;
