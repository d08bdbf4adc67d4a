//! Stackshift configuration
//!
//! Layers an optional TOML file under `STACKSHIFT_`-prefixed environment
//! variables. Only hosts read configuration; the pipeline crates take every
//! setting by value.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{
    DetectionConfig, LimitsConfig, OutputConfig, ParsingConfig, ParsingMode, StackshiftConfig,
};
