//! Configuration module for tmc5160.
//!
//! Provides types for loading and validating driver configurations from TOML
//! files (with `std` feature) or pre-parsed data.

mod driver;
mod polling;
mod ramp;
mod system;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use driver::{ChopperSettings, CurrentSettings, DriverConfig};
pub use polling::PollPolicy;
pub use ramp::RampParameters;
pub use system::SystemConfig;
pub use validation::{validate_config, validate_driver, validate_ramp};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
