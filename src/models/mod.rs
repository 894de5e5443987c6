pub mod inventory;
pub mod measurement;
pub mod season;
pub mod station;

pub use inventory::InventoryEntry;
pub use measurement::{Element, Measurement};
pub use season::Season;
pub use station::Station;
