//! Typed payloads of the modeled registers.
//!
//! Bit positions are given in register-word order (bit 0 is the least
//! significant bit of the big-endian payload). Reserved bits are cleared when
//! a payload is built from a raw word, so they are never sent back to the chip.

use core::str::FromStr;

use bitfield::bitfield;

use crate::error::MotionError;

/// Generates the raw-word conversions for a bitfield payload type.
macro_rules! impl_payload {
    ($T:ident, $inner:ty, $valid:expr) => {
        impl $T {
            /// Bits of the word carrying data; everything else is reserved.
            pub const VALID_MASK: $inner = $valid;

            /// Build from a raw word, clearing reserved bits.
            #[inline]
            pub const fn from_bits(bits: $inner) -> Self {
                Self(bits & Self::VALID_MASK)
            }

            /// Raw word with reserved bits cleared.
            #[inline]
            pub const fn bits(&self) -> $inner {
                self.0 & Self::VALID_MASK
            }
        }

        impl From<$inner> for $T {
            fn from(bits: $inner) -> Self {
                Self::from_bits(bits)
            }
        }

        impl From<$T> for $inner {
            fn from(value: $T) -> Self {
                value.bits()
            }
        }
    };
}

bitfield! {
    /// GCONF (0x00): global configuration flags.
    #[derive(Clone, Copy, Default, Eq, PartialEq)]
    pub struct GlobalConfig(u32);
    impl Debug;
    u32;
    /// Zero crossing recalibration during driver disable.
    pub recalibrate, set_recalibrate: 0;
    /// Short standstill timeout (2^18 instead of 2^20 clocks).
    pub faststandstill, set_faststandstill: 1;
    /// Enable stealthChop voltage PWM mode.
    pub en_pwm_mode, set_en_pwm_mode: 2;
    /// Enable step input filtering for stealthChop optimization.
    pub multistep_filt, set_multistep_filt: 3;
    /// Invert motor direction.
    pub shaft, set_shaft: 4;
    /// DIAG0 active on driver errors.
    pub diag0_error, set_diag0_error: 5;
    /// DIAG0 active on driver overtemperature prewarning.
    pub diag0_otpw, set_diag0_otpw: 6;
    /// DIAG0 active on motor stall (step output in motion controller mode).
    pub diag0_stall, set_diag0_stall: 7;
    /// DIAG1 active on motor stall (direction output in motion controller mode).
    pub diag1_stall, set_diag1_stall: 8;
    /// DIAG1 active on index position.
    pub diag1_index, set_diag1_index: 9;
    /// DIAG1 active when the chopper is on.
    pub diag1_onstate, set_diag1_onstate: 10;
    /// DIAG1 toggles when dcStep skips steps.
    pub diag1_steps_skipped, set_diag1_steps_skipped: 11;
    /// DIAG0 is push-pull active high instead of open collector.
    pub diag0_int_pushpull, set_diag0_int_pushpull: 12;
    /// DIAG1 is push-pull active high instead of open collector.
    pub diag1_poscomp_pushpull, set_diag1_poscomp_pushpull: 13;
    /// TSTEP comparison hysteresis of 1/32 instead of 1/16.
    pub small_hysteresis, set_small_hysteresis: 14;
    /// Emergency stop on the DCEN input.
    pub stop_enable, set_stop_enable: 15;
    /// Coil currents and polarity taken directly from XDIRECT.
    pub direct_mode, set_direct_mode: 16;
    /// Factory test mode; keep cleared.
    pub test_mode, set_test_mode: 17;
}

impl_payload!(GlobalConfig, u32, 0x0003_FFFF);

bitfield! {
    /// IHOLD_IRUN (0x10): standstill and run current scaling.
    #[derive(Clone, Copy, Default, Eq, PartialEq)]
    pub struct CurrentControl(u32);
    impl Debug;
    u8;
    /// Standstill current (0-31).
    pub ihold, set_ihold: 4, 0;
    /// Motor run current (0-31).
    pub irun, set_irun: 12, 8;
    /// Number of clock cycles for motor power down after standstill, in 2^18 units.
    pub iholddelay, set_iholddelay: 19, 16;
}

impl_payload!(CurrentControl, u32, 0x000F_1F1F);

bitfield! {
    /// CHOPCONF (0x6C): chopper and driver configuration.
    #[derive(Clone, Copy, Default, Eq, PartialEq)]
    pub struct ChopperConfig(u32);
    impl Debug;
    u8;
    /// Off time; 0 disables the driver.
    pub toff, set_toff: 3, 0;
    /// Hysteresis start value (or fast decay time with `chm`).
    pub hstrt, set_hstrt: 6, 4;
    /// Hysteresis end value (or sine wave offset with `chm`).
    pub hend, set_hend: 10, 7;
    /// MSB of the fast decay time (with `chm`).
    pub fd3, set_fd3: 11;
    /// Disable current comparator usage for fast decay termination.
    pub disfdcc, set_disfdcc: 12;
    /// Chopper mode: false = spreadCycle, true = constant off time.
    pub chm, set_chm: 14;
    /// Comparator blank time select.
    pub tbl, set_tbl: 16, 15;
    /// Switch to full step above VHIGH.
    pub vhighfs, set_vhighfs: 18;
    /// Switch to constant off time chopper above VHIGH.
    pub vhighchm, set_vhighchm: 19;
    /// Passive fast decay time.
    pub tpfd, set_tpfd: 23, 20;
    /// Microstep resolution: 0 = 256 microsteps ... 8 = full step.
    pub mres, set_mres: 27, 24;
    /// Interpolate the microstep resolution to 256 microsteps.
    pub intpol, set_intpol: 28;
    /// Step on both edges of the STEP input.
    pub dedge, set_dedge: 29;
    /// Disable short to GND protection.
    pub diss2g, set_diss2g: 30;
    /// Disable low side short protection.
    pub diss2vs, set_diss2vs: 31;
}

// Bits 13 and 17 are reserved.
impl_payload!(ChopperConfig, u32, 0xFFFD_DFFF);

bitfield! {
    /// RAMP_STAT (0x35): ramp generator and reference switch status.
    #[derive(Clone, Copy, Default, Eq, PartialEq)]
    pub struct RampStatus(u32);
    impl Debug;
    u32;
    /// Left reference switch state.
    pub status_stop_l, _: 0;
    /// Right reference switch state.
    pub status_stop_r, _: 1;
    /// Left latch event occurred (cleared on read).
    pub status_latch_l, _: 2;
    /// Right latch event occurred (cleared on read).
    pub status_latch_r, _: 3;
    /// Motor stopped by the left reference switch.
    pub event_stop_l, _: 4;
    /// Motor stopped by the right reference switch.
    pub event_stop_r, _: 5;
    /// Motor stopped by a stallGuard event.
    pub event_stop_sg, _: 6;
    /// Target position reached event (cleared on read).
    pub event_pos_reached, _: 7;
    /// Actual velocity equals VMAX.
    pub velocity_reached, _: 8;
    /// Actual position equals XTARGET.
    pub position_reached, _: 9;
    /// Actual velocity is zero.
    pub vzero, _: 10;
    /// TZEROWAIT is running after a stop.
    pub t_zerowait_active, _: 11;
    /// Automatic ramp needed a second move to reach the target.
    pub second_move, _: 12;
    /// Active stallGuard status.
    pub status_sg, _: 13;
}

impl_payload!(RampStatus, u32, 0x0000_3FFF);

bitfield! {
    /// Status byte returned as the first byte of every response frame.
    #[derive(Clone, Copy, Default, Eq, PartialEq)]
    pub struct SpiStatus(u8);
    impl Debug;
    u8;
    /// Right reference stop switch active.
    pub stop_right, _: 0;
    /// Left reference stop switch active.
    pub stop_left, _: 1;
    /// Actual position equals XTARGET.
    pub position_reached, _: 2;
    /// Actual velocity equals VMAX.
    pub velocity_reached, _: 3;
    /// Motor at standstill.
    pub standstill, _: 4;
    /// StallGuard flag (sg2).
    pub stall, _: 5;
    /// Driver error flagged in GSTAT (short or overtemperature).
    pub driver_error, _: 6;
    /// Chip reset since GSTAT was last read.
    pub reset_flag, _: 7;
}

impl_payload!(SpiStatus, u8, 0xFF);

/// RAMPMODE (0x20): operating mode of the ramp generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RampMode {
    /// Positioning mode using all ramp parameters.
    #[default]
    Position = 0,
    /// Velocity mode towards positive VMAX.
    Positive = 1,
    /// Velocity mode towards negative VMAX.
    Negative = 2,
    /// Velocity remains unchanged unless a stop event occurs.
    Hold = 3,
}

impl RampMode {
    /// All modes, in code order.
    pub const ALL: [RampMode; 4] = [
        RampMode::Position,
        RampMode::Positive,
        RampMode::Negative,
        RampMode::Hold,
    ];

    /// Register code of the mode.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a register code; `None` for unmapped codes.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(RampMode::Position),
            1 => Some(RampMode::Positive),
            2 => Some(RampMode::Negative),
            3 => Some(RampMode::Hold),
            _ => None,
        }
    }

    /// Lower-case mode name.
    pub const fn as_str(self) -> &'static str {
        match self {
            RampMode::Position => "position",
            RampMode::Positive => "positive",
            RampMode::Negative => "negative",
            RampMode::Hold => "hold",
        }
    }

    /// Whether this is one of the two velocity modes.
    #[inline]
    pub const fn is_velocity(self) -> bool {
        matches!(self, RampMode::Positive | RampMode::Negative)
    }
}

impl TryFrom<u8> for RampMode {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        RampMode::from_code(code).ok_or(code)
    }
}

impl FromStr for RampMode {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RampMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                MotionError::InvalidArgument(heapless::String::try_from(s).unwrap_or_default())
            })
    }
}

impl core::fmt::Display for RampMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_bit_positions() {
        let mut gconf = GlobalConfig::default();
        gconf.set_en_pwm_mode(true);
        gconf.set_multistep_filt(true);
        assert_eq!(gconf.bits(), 0b1100);

        gconf.set_test_mode(true);
        assert_eq!(gconf.bits(), 0x0002_000C);
    }

    #[test]
    fn test_reserved_bits_are_dropped() {
        assert_eq!(GlobalConfig::from_bits(0xFFFF_FFFF).bits(), 0x0003_FFFF);
        assert_eq!(RampStatus::from_bits(0xFFFF_C000).bits(), 0);
        assert_eq!(ChopperConfig::from_bits(0x0002_2000).bits(), 0);
    }

    #[test]
    fn test_current_control_layout() {
        let mut current = CurrentControl::default();
        current.set_ihold(2);
        current.set_irun(15);
        current.set_iholddelay(2);
        assert_eq!(current.bits(), 0x0002_0F02);

        let decoded = CurrentControl::from_bits(0x0002_0F02);
        assert_eq!(decoded.ihold(), 2);
        assert_eq!(decoded.irun(), 15);
        assert_eq!(decoded.iholddelay(), 2);
    }

    #[test]
    fn test_chopper_config_layout() {
        let mut chop = ChopperConfig::default();
        chop.set_toff(3);
        chop.set_hstrt(4);
        chop.set_hend(1);
        chop.set_tbl(2);
        assert_eq!(chop.bits(), 0x0001_00C3);
        assert!(!chop.chm());
    }

    #[test]
    fn test_ramp_status_flags() {
        let stat = RampStatus::from_bits(1 << 9);
        assert!(stat.position_reached());
        assert!(!stat.velocity_reached());
        assert!(!stat.vzero());

        let stat = RampStatus::from_bits((1 << 8) | (1 << 10));
        assert!(stat.velocity_reached());
        assert!(stat.vzero());
    }

    #[test]
    fn test_spi_status_msb_first() {
        let status = SpiStatus::from_bits(0b1000_0100);
        assert!(status.reset_flag());
        assert!(status.position_reached());
        assert!(!status.driver_error());
        assert!(!status.stop_right());
    }

    #[test]
    fn test_status_flag_positions() {
        let stat = RampStatus::from_bits((1 << 0) | (1 << 6) | (1 << 13));
        assert!(stat.status_stop_l());
        assert!(!stat.status_stop_r());
        assert!(stat.event_stop_sg());
        assert!(stat.status_sg());
        assert!(!stat.second_move());

        let status = SpiStatus::from_bits(0b0111_0010);
        assert!(status.stop_left());
        assert!(status.standstill());
        assert!(status.stall());
        assert!(status.driver_error());
        assert!(!status.velocity_reached());

        let mut chop = ChopperConfig::default();
        chop.set_intpol(true);
        chop.set_diss2vs(true);
        assert_eq!(chop.bits(), 0x9000_0000);
    }

    #[test]
    fn test_ramp_mode_codes() {
        for mode in RampMode::ALL {
            assert_eq!(RampMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(RampMode::try_from(4), Err(4));
    }

    #[test]
    fn test_ramp_mode_from_str() {
        assert_eq!("negative".parse::<RampMode>(), Ok(RampMode::Negative));
        assert!(matches!(
            "sideways".parse::<RampMode>(),
            Err(MotionError::InvalidArgument(_))
        ));
    }
}
