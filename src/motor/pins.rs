//! Placeholder pin for drivers wired without an enable line.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

/// Enable pin that does nothing.
///
/// Used as the default enable pin type, so `enable_motor` and
/// `disable_motor` succeed without touching hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoEnablePin;

impl ErrorType for NoEnablePin {
    type Error = Infallible;
}

impl OutputPin for NoEnablePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
