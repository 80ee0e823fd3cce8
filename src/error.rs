//! Error types for the tmc5160 driver.
//!
//! Provides unified error handling across register access, motion commands,
//! the SPI transport and configuration.

use core::fmt;

use crate::motor::MotionGoal;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all driver operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Register catalog or payload error
    Register(RegisterError),
    /// Motion command error
    Motion(MotionError),
    /// SPI or GPIO failure
    Transport(TransportError),
    /// Configuration parsing or validation error
    Config(ConfigError),
}

/// Register access errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// Name is not in the register catalog
    UnknownRegister(heapless::String<32>),
    /// Register cannot be read
    ReadForbidden(&'static str),
    /// Register cannot be written
    WriteForbidden(&'static str),
    /// Value cannot be encoded for the register
    InvalidRegisterValue(&'static str),
    /// Payload read from the chip does not decode
    Decode {
        /// Register name
        register: &'static str,
        /// Raw register word
        raw: u32,
    },
}

/// Motion command errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    /// Argument outside the accepted set (e.g. a non-velocity ramp mode)
    InvalidArgument(heapless::String<32>),
    /// Poll bound reached before the motion goal was observed
    Timeout {
        /// Goal that was awaited
        goal: MotionGoal,
        /// Status reads performed
        polls: u32,
    },
}

/// Transport failures. The underlying HAL error is not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// SPI transfer or flush failed
    Spi,
    /// Chip-select pin operation failed
    ChipSelect,
    /// Enable pin operation failed
    EnablePin,
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Driver name not found in configuration
    DriverNotFound(heapless::String<32>),
    /// Builder is missing a required part
    MissingField(&'static str),
    /// Current setting exceeds its field width
    CurrentOutOfRange {
        /// Setting name
        field: &'static str,
        /// Configured value
        value: u8,
        /// Largest accepted value
        max: u8,
    },
    /// Chopper setting exceeds its field width
    ChopperOutOfRange {
        /// Setting name
        field: &'static str,
        /// Configured value
        value: u8,
        /// Largest accepted value
        max: u8,
    },
    /// Ramp parameter exceeds its register width (or is zero where that is not allowed)
    RampParameterOutOfRange {
        /// Parameter name
        field: &'static str,
        /// Configured value
        value: u32,
        /// Largest accepted value
        max: u32,
    },
    /// VSTOP must not be below VSTART
    InvalidRampOrder {
        /// Configured VSTART
        vstart: u32,
        /// Configured VSTOP
        vstop: u32,
    },
    /// TPWMTHRS exceeds 20 bits
    PwmThresholdOutOfRange(u32),
    /// Poll interval or poll bound is zero
    InvalidPollPolicy,
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Register(e) => write!(f, "Register error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::UnknownRegister(name) => write!(f, "Unknown register '{}'", name),
            RegisterError::ReadForbidden(name) => write!(f, "Register {} is not readable", name),
            RegisterError::WriteForbidden(name) => write!(f, "Register {} is not writable", name),
            RegisterError::InvalidRegisterValue(name) => {
                write!(f, "Value cannot be encoded for register {}", name)
            }
            RegisterError::Decode { register, raw } => {
                write!(f, "Cannot decode {} payload {:#010x}", register, raw)
            }
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidArgument(arg) => write!(f, "Invalid argument: '{}'", arg),
            MotionError::Timeout { goal, polls } => {
                write!(f, "{:?} not reached after {} status reads", goal, polls)
            }
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Spi => write!(f, "SPI transfer failed"),
            TransportError::ChipSelect => write!(f, "Chip-select pin operation failed"),
            TransportError::EnablePin => write!(f, "Enable pin operation failed"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::DriverNotFound(name) => write!(f, "Driver '{}' not found", name),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            ConfigError::CurrentOutOfRange { field, value, max } => {
                write!(f, "Current setting {} = {} exceeds {}", field, value, max)
            }
            ConfigError::ChopperOutOfRange { field, value, max } => {
                write!(f, "Chopper setting {} = {} exceeds {}", field, value, max)
            }
            ConfigError::RampParameterOutOfRange { field, value, max } => {
                write!(f, "Ramp parameter {} = {} outside 1..={}", field, value, max)
            }
            ConfigError::InvalidRampOrder { vstart, vstop } => {
                write!(f, "VSTOP ({}) must be >= VSTART ({})", vstop, vstart)
            }
            ConfigError::PwmThresholdOutOfRange(v) => {
                write!(f, "PWM threshold {} exceeds 20 bits", v)
            }
            ConfigError::InvalidPollPolicy => {
                write!(f, "Poll interval and poll bound must be > 0")
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Register(RegisterError::UnknownRegister(name)) => {
                defmt::write!(f, "unknown register {=str}", name.as_str())
            }
            Error::Register(RegisterError::ReadForbidden(name)) => {
                defmt::write!(f, "{=str} is not readable", name)
            }
            Error::Register(RegisterError::WriteForbidden(name)) => {
                defmt::write!(f, "{=str} is not writable", name)
            }
            Error::Register(RegisterError::InvalidRegisterValue(name)) => {
                defmt::write!(f, "invalid value for {=str}", name)
            }
            Error::Register(RegisterError::Decode { register, raw }) => {
                defmt::write!(f, "cannot decode {=str} payload {=u32:#x}", register, raw)
            }
            Error::Motion(MotionError::InvalidArgument(arg)) => {
                defmt::write!(f, "invalid argument {=str}", arg.as_str())
            }
            Error::Motion(MotionError::Timeout { polls, .. }) => {
                defmt::write!(f, "motion goal not reached after {=u32} polls", polls)
            }
            Error::Transport(e) => defmt::write!(f, "transport error: {}", e),
            Error::Config(_) => defmt::write!(f, "configuration error"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TransportError::Spi => defmt::write!(f, "SPI"),
            TransportError::ChipSelect => defmt::write!(f, "chip select"),
            TransportError::EnablePin => defmt::write!(f, "enable pin"),
        }
    }
}

// Conversion impls
impl From<RegisterError> for Error {
    fn from(e: RegisterError) -> Self {
        Error::Register(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for RegisterError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
