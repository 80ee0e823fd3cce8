//! Ramp generator parameters.

use serde::Deserialize;

/// Acceleration and velocity plateaus of the ramp generator.
///
/// Units are the chip's internal ones (microsteps per time unit, per time
/// unit squared). [`Default`] gives the values written by
/// [`Tmc5160::apply_defaults`](crate::Tmc5160::apply_defaults).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct RampParameters {
    /// First acceleration between VSTART and V1.
    pub a1: u32,
    /// Threshold velocity between the A1/D1 and AMAX/DMAX phases.
    pub v1: u32,
    /// Deceleration between V1 and VSTOP.
    pub d1: u32,
    /// Acceleration between V1 and VMAX.
    pub amax: u32,
    /// Target velocity.
    pub vmax: u32,
    /// Deceleration between VMAX and V1.
    pub dmax: u32,
    /// Start velocity.
    pub vstart: u32,
    /// Stop velocity.
    pub vstop: u32,
}

impl Default for RampParameters {
    fn default() -> Self {
        Self {
            a1: 5_000,
            v1: 5_000,
            d1: 5_000,
            amax: 25_000,
            vmax: 25_000,
            dmax: 25_000,
            vstart: 1,
            vstop: 10,
        }
    }
}
