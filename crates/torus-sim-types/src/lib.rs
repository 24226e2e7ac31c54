pub mod config;
pub mod error;
pub mod rule;

pub use config::{RawConfig, SimConfig, SimConfigOverride};
pub use error::{ConfigError, SimError};
pub use rule::Rule;
