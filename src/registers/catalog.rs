//! Register catalog: address, access mode and payload codec of every modeled register.
//!
//! Only part of the chip's register map is modeled. Registers not listed here
//! (GSTAT, IFCNT, SLAVECONF, IOIN, TSTEP, TCOOLTHRS, THIGH, TZEROWAIT, SW_MODE,
//! XLATCH, the encoder block, the microstep table, COOLCONF, DRV_STATUS, PWMCONF
//! and friends) are absent, and looking them up fails with
//! [`RegisterError::UnknownRegister`].

use crate::error::RegisterError;

use super::fields::{ChopperConfig, CurrentControl, GlobalConfig, RampMode, RampStatus};
use super::value::{Codec, RegisterValue};

/// Which operations a register supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterAccessMode {
    /// Read only.
    Read,
    /// Write only.
    Write,
    /// Read and write.
    ReadWrite,
    /// Readable; flags clear on the chip when written with 1. Writes are not issued by this driver.
    ReadWriteClear,
}

impl RegisterAccessMode {
    /// Whether a read request may be sent.
    #[inline]
    pub const fn is_readable(self) -> bool {
        matches!(
            self,
            RegisterAccessMode::Read | RegisterAccessMode::ReadWrite | RegisterAccessMode::ReadWriteClear
        )
    }

    /// Whether a write request may be sent.
    #[inline]
    pub const fn is_writable(self) -> bool {
        matches!(self, RegisterAccessMode::Write | RegisterAccessMode::ReadWrite)
    }
}

/// Static description of one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDescriptor {
    /// Datasheet name, e.g. `"XTARGET"`.
    pub name: &'static str,
    /// 7-bit register address.
    pub address: u8,
    /// Allowed operations.
    pub access: RegisterAccessMode,
    /// Payload codec; `None` means a plain unsigned 32-bit word.
    pub codec: Option<Codec>,
}

impl RegisterDescriptor {
    /// Create a descriptor. The address must fit in 7 bits.
    pub const fn new(
        name: &'static str,
        address: u8,
        access: RegisterAccessMode,
        codec: Option<Codec>,
    ) -> Self {
        assert!(address <= 0x7F, "register address exceeds 7 bits");
        Self {
            name,
            address,
            access,
            codec,
        }
    }

    /// Decode a wire payload read from this register.
    pub fn decode(&self, payload: [u8; 4]) -> Result<RegisterValue, RegisterError> {
        match self.codec {
            Some(codec) => codec.decode(self.name, payload),
            None => Ok(RegisterValue::Raw(u32::from_be_bytes(payload))),
        }
    }

    /// Encode a value for writing to this register.
    pub fn encode(&self, value: &RegisterValue) -> Result<[u8; 4], RegisterError> {
        match self.codec {
            Some(codec) => codec.encode(self.name, value),
            None => value
                .as_unsigned()
                .map(u32::to_be_bytes)
                .ok_or(RegisterError::InvalidRegisterValue(self.name)),
        }
    }
}

/// A register known at compile time.
///
/// Each modeled register has a zero-sized marker type implementing this trait,
/// so typed access through [`RegisterBus`](crate::bus::RegisterBus) cannot name
/// an unknown register.
pub trait Register {
    /// Catalog entry of the register.
    const DESCRIPTOR: RegisterDescriptor;

    /// Decoded payload type.
    type Value: Into<RegisterValue> + TryFrom<RegisterValue>;
}

macro_rules! catalog {
    ($(
        $(#[$doc:meta])*
        $marker:ident => $name:literal, $address:literal, $access:ident, $codec:expr, $value:ty;
    )*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $marker;

            impl Register for $marker {
                const DESCRIPTOR: RegisterDescriptor =
                    RegisterDescriptor::new($name, $address, RegisterAccessMode::$access, $codec);
                type Value = $value;
            }
        )*

        /// Every modeled register, in address order.
        pub static CATALOG: &[RegisterDescriptor] = &[
            $(<$marker as Register>::DESCRIPTOR,)*
        ];
    };
}

catalog! {
    // General configuration
    /// GCONF: global configuration flags.
    Gconf => "GCONF", 0x00, ReadWrite, Some(Codec::GlobalConfig), GlobalConfig;

    // Velocity dependent driver feature control
    /// IHOLD_IRUN: hold and run current.
    IholdIrun => "IHOLD_IRUN", 0x10, Write, Some(Codec::CurrentControl), CurrentControl;
    /// TPOWERDOWN: delay from standstill to current reduction.
    Tpowerdown => "TPOWERDOWN", 0x11, Write, Some(Codec::LowByte), u8;
    /// TPWMTHRS: upper velocity for stealthChop voltage PWM mode.
    Tpwmthrs => "TPWMTHRS", 0x13, Write, None, u32;

    // Ramp generator motion control
    /// RAMPMODE: positioning or velocity mode.
    Rampmode => "RAMPMODE", 0x20, ReadWrite, Some(Codec::RampMode), RampMode;
    /// XACTUAL: actual motor position.
    Xactual => "XACTUAL", 0x21, ReadWrite, Some(Codec::Signed32), i32;
    /// VACTUAL: actual motor velocity.
    Vactual => "VACTUAL", 0x22, Read, Some(Codec::Signed24), i32;
    /// VSTART: start velocity.
    Vstart => "VSTART", 0x23, Write, None, u32;
    /// A1: first acceleration between VSTART and V1.
    A1 => "A1", 0x24, Write, None, u32;
    /// V1: first acceleration / deceleration phase threshold velocity.
    V1 => "V1", 0x25, Write, None, u32;
    /// AMAX: second acceleration between V1 and VMAX.
    Amax => "AMAX", 0x26, Write, None, u32;
    /// VMAX: motion ramp target velocity.
    Vmax => "VMAX", 0x27, Write, None, u32;
    /// DMAX: deceleration between VMAX and V1.
    Dmax => "DMAX", 0x28, Write, None, u32;
    /// D1: deceleration between V1 and VSTOP.
    D1 => "D1", 0x2A, Write, None, u32;
    /// VSTOP: motor stop velocity.
    Vstop => "VSTOP", 0x2B, Write, None, u32;
    /// XTARGET: target position for ramp mode.
    Xtarget => "XTARGET", 0x2D, ReadWrite, Some(Codec::Signed32), i32;

    // Ramp generator driver feature control
    /// RAMP_STAT: ramp and reference switch status.
    RampStat => "RAMP_STAT", 0x35, ReadWriteClear, Some(Codec::RampStatus), RampStatus;

    // Motor driver
    /// CHOPCONF: chopper configuration.
    Chopconf => "CHOPCONF", 0x6C, ReadWrite, Some(Codec::ChopperConfig), ChopperConfig;
}

/// Look up a register by datasheet name.
pub fn lookup(name: &str) -> Result<&'static RegisterDescriptor, RegisterError> {
    CATALOG
        .iter()
        .find(|descriptor| descriptor.name == name)
        .ok_or_else(|| RegisterError::UnknownRegister(heapless::String::try_from(name).unwrap_or_default()))
}
