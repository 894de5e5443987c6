pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod provider;
pub mod readers;
pub mod utils;

pub use config::{MalformedLinePolicy, ProviderConfig};
pub use error::{ProcessingError, Result};
pub use models::{Element, Measurement, Season, Station};
pub use provider::DataProvider;
