pub mod config;
pub mod config_loader;
pub mod cycle;
pub mod error;
pub mod stats;
pub mod token;

pub use config::{AnalysisConfig, BootstrapSettings, ExclusionSets};
pub use config_loader::ConfigLoader;
pub use cycle::{canonical_cycles, validate_cycles, CycleType, MarketCycle};
pub use error::AnalysisError;
pub use token::{ListingStatus, TokenRecord};
