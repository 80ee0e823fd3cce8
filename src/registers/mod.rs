//! Register map of the TMC5160.
//!
//! - [`catalog`]: addresses, access modes and marker types for typed access
//! - [`fields`]: bit-packed payload types
//! - [`value`]: the tagged [`RegisterValue`] and the payload [`Codec`]s

pub mod catalog;
pub mod fields;
pub mod value;

pub use catalog::{
    lookup, Register, RegisterAccessMode, RegisterDescriptor, CATALOG,
    A1, Amax, Chopconf, D1, Dmax, Gconf, IholdIrun, RampStat, Rampmode, Tpowerdown, Tpwmthrs,
    V1, Vactual, Vmax, Vstart, Vstop, Xactual, Xtarget,
};
pub use fields::{ChopperConfig, CurrentControl, GlobalConfig, RampMode, RampStatus, SpiStatus};
pub use value::{Codec, RegisterValue};
