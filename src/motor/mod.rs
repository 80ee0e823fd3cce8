//! Motor module for tmc5160.
//!
//! Provides the device handle, its builder and the status polling used by
//! the wait operations.

mod builder;
mod driver;
mod pins;
mod poll;

pub use builder::Tmc5160Builder;
pub use driver::Tmc5160;
pub use pins::NoEnablePin;
pub use poll::{MotionGoal, PollStep, Poller};
