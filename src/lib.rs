//! # tmc5160
//!
//! SPI driver for the TMC5160 stepper motor controller with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Typed registers**: every modeled register has a marker type, a payload type and an access mode
//! - **embedded-hal 1.0**: `SpiBus` transport, `OutputPin` chip-select and enable lines
//! - **Async waits**: motion commands can suspend on `embedded-hal-async` `DelayNs` until the ramp
//!   generator reports the goal reached
//! - **Configuration-driven**: define drivers in TOML files
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tmc5160::{RampMode, SystemConfig, Tmc5160};
//!
//! // Load configuration from TOML
//! let config: SystemConfig = tmc5160::load_config("drivers.toml")?;
//!
//! // Create the handle; baseline registers are written by build()
//! let mut motor = Tmc5160::builder()
//!     .from_config(&config, "x_axis")?
//!     .spi(spi)
//!     .chip_select(cs)
//!     .delay(delay)
//!     .build()
//!     .map_err(|(_builder, e)| e)?;
//!
//! motor.enable_motor()?;
//! let written = motor.set_target_position(10_000, true).await?;
//! motor.set_velocity(RampMode::Negative, Some(20_000), None, false).await?;
//! motor.stop_motor(true).await?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod bus;
pub mod codec;
pub mod config;
pub mod error;
pub mod frame;
pub mod motor;
pub mod registers;

// Re-exports for ergonomic API
pub use bus::RegisterBus;
pub use config::{validate_config, DriverConfig, PollPolicy, RampParameters, SystemConfig};
pub use error::{Error, Result};
pub use frame::{build_read_frame, build_write_frame, parse_response, Response};
pub use motor::{MotionGoal, NoEnablePin, Tmc5160, Tmc5160Builder};
pub use registers::{
    lookup, Register, RegisterAccessMode, RegisterDescriptor, RegisterValue, RampMode,
    RampStatus, SpiStatus,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
