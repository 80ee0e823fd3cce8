//! Decoded register values and the per-register payload codecs.

use crate::codec::{self, LOW_24, LOW_BYTE};
use crate::error::RegisterError;

use super::fields::{ChopperConfig, CurrentControl, GlobalConfig, RampMode, RampStatus};

/// A register value as produced by a read or accepted by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterValue {
    /// Unmodeled payload, the 32-bit word as sent on the wire.
    Raw(u32),
    /// GCONF flags.
    GlobalConfig(GlobalConfig),
    /// IHOLD_IRUN currents.
    CurrentControl(CurrentControl),
    /// Single-byte value (TPOWERDOWN).
    Byte(u8),
    /// RAMPMODE.
    RampMode(RampMode),
    /// Signed position or velocity (XACTUAL, XTARGET, VACTUAL).
    Signed(i32),
    /// RAMP_STAT flags.
    RampStatus(RampStatus),
    /// CHOPCONF settings.
    ChopperConfig(ChopperConfig),
}

impl RegisterValue {
    /// The value as an unsigned integer, when it is one.
    ///
    /// Used for registers without a codec, which take a plain 32-bit word.
    pub fn as_unsigned(&self) -> Option<u32> {
        match *self {
            RegisterValue::Raw(v) => Some(v),
            RegisterValue::Byte(v) => Some(u32::from(v)),
            RegisterValue::Signed(v) => u32::try_from(v).ok(),
            _ => None,
        }
    }
}

/// Payload codec attached to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Codec {
    /// GCONF flag word.
    GlobalConfig,
    /// IHOLD_IRUN fields.
    CurrentControl,
    /// One unsigned byte in the low end of the word.
    LowByte,
    /// RAMPMODE code in the low byte.
    RampMode,
    /// Full-width two's-complement integer.
    Signed32,
    /// 24-bit two's-complement integer in the low end of the word.
    Signed24,
    /// RAMP_STAT flag word.
    RampStatus,
    /// CHOPCONF fields.
    ChopperConfig,
}

impl Codec {
    /// Decode a wire payload for `register`.
    pub fn decode(self, register: &'static str, payload: [u8; 4]) -> Result<RegisterValue, RegisterError> {
        let word = codec::word_from_payload(payload);
        let value = match self {
            Codec::GlobalConfig => RegisterValue::GlobalConfig(GlobalConfig::from_bits(word)),
            Codec::CurrentControl => RegisterValue::CurrentControl(CurrentControl::from_bits(word)),
            Codec::LowByte => RegisterValue::Byte(LOW_BYTE.extract(word) as u8),
            Codec::RampMode => {
                let code = LOW_BYTE.extract(word);
                let mode = RampMode::from_code(code as u8)
                    .ok_or(RegisterError::Decode { register, raw: word })?;
                RegisterValue::RampMode(mode)
            }
            Codec::Signed32 => RegisterValue::Signed(word as i32),
            Codec::Signed24 => RegisterValue::Signed(LOW_24.extract_signed(word)),
            Codec::RampStatus => RegisterValue::RampStatus(RampStatus::from_bits(word)),
            Codec::ChopperConfig => RegisterValue::ChopperConfig(ChopperConfig::from_bits(word)),
        };
        Ok(value)
    }

    /// Encode `value` into a wire payload for `register`.
    ///
    /// Integer codecs also accept a [`RegisterValue::Raw`] that fits their range.
    pub fn encode(self, register: &'static str, value: &RegisterValue) -> Result<[u8; 4], RegisterError> {
        let invalid = RegisterError::InvalidRegisterValue(register);
        let word = match (self, *value) {
            (Codec::GlobalConfig, RegisterValue::GlobalConfig(v)) => v.bits(),
            (Codec::CurrentControl, RegisterValue::CurrentControl(v)) => v.bits(),
            (Codec::LowByte, RegisterValue::Byte(v)) => u32::from(v),
            (Codec::LowByte, RegisterValue::Raw(v)) if LOW_BYTE.fits(v) => v,
            (Codec::RampMode, RegisterValue::RampMode(mode)) => u32::from(mode.code()),
            (Codec::Signed32, RegisterValue::Signed(v)) => v as u32,
            (Codec::Signed32, RegisterValue::Raw(v)) if i32::try_from(v).is_ok() => v,
            (Codec::Signed24, RegisterValue::Signed(v)) if LOW_24.fits_signed(v) => {
                LOW_24.insert(0, v as u32)
            }
            (Codec::RampStatus, RegisterValue::RampStatus(v)) => v.bits(),
            (Codec::ChopperConfig, RegisterValue::ChopperConfig(v)) => v.bits(),
            _ => return Err(invalid),
        };
        Ok(codec::payload_from_word(word))
    }
}

macro_rules! impl_value_conversions {
    ($($T:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$T> for RegisterValue {
                fn from(value: $T) -> Self {
                    RegisterValue::$variant(value)
                }
            }

            impl TryFrom<RegisterValue> for $T {
                type Error = RegisterValue;

                fn try_from(value: RegisterValue) -> Result<Self, Self::Error> {
                    match value {
                        RegisterValue::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_value_conversions! {
    u32 => Raw,
    GlobalConfig => GlobalConfig,
    CurrentControl => CurrentControl,
    u8 => Byte,
    RampMode => RampMode,
    i32 => Signed,
    RampStatus => RampStatus,
    ChopperConfig => ChopperConfig,
}
